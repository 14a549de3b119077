//! taskchat-tui: terminal chat client for the todo assistant backend.
//!
//! One screen: the conversation transcript, a quick actions sidebar and a
//! single-line composer. Requests run on tokio tasks while the event loop
//! keeps drawing; at most one is outstanding at a time.

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod transcript;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Focus};
pub use event::{Action, Event, EventHandler};
pub use taskchat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use taskchat_engine::{exchange, ChatSession, ClientConfig, HttpBackend, Message, SessionId};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop until the user quits and
/// restores the terminal on exit.
pub async fn run_tui(
    config: &ClientConfig,
    session_id: SessionId,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(HttpBackend::new(config)?);
    info!(base_url = backend.base_url(), user_id = %session_id, "starting chat");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let chat = ChatSession::new(session_id, config.conversation_id);
    let mut app = App::new(chat, config.base_url());
    let mut events = EventHandler::new(config.tick_rate_ms);

    let result = run_loop(&mut terminal, &mut app, &mut events, &backend).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    backend: &Arc<HttpBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut in_flight: Option<JoinHandle<Message>> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            screens::chat::ChatScreen.render(app, area, buf);

            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        match events.next().await {
            Some(event) => match event {
                Event::Key(key) => {
                    if !(app.input_has_focus() && handle_input_key(app, key)) {
                        app.handle_action(event::key_to_action(key));
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            },
            None => {
                error!("terminal event stream closed");
                app.should_quit = true;
            }
        }

        // The composer only hands out a request when nothing is outstanding
        if let Some(request) = app.take_pending_request() {
            let backend = Arc::clone(backend);
            let base_url = app.base_url.clone();
            in_flight = Some(tokio::spawn(async move {
                exchange(backend.as_ref(), &request, &base_url).await
            }));
        }

        if in_flight.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = in_flight.take() {
                let reply = match handle.await {
                    Ok(reply) => reply,
                    Err(e) => {
                        error!(error = %e, "chat task failed");
                        Message::transport_error(&app.base_url)
                    }
                };
                app.complete(reply);
            }
        }

        if app.should_quit {
            if let Some(handle) = in_flight.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Handle a key while the input field has focus.
///
/// Returns true if the key was consumed. Typing is ignored while a reply is
/// outstanding; navigation keys fall through to the action handler.
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    // AltGr arrives as Ctrl+Alt on many layouts and produces plain characters
    let alt_gr = key.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT)
        && matches!(key.code, KeyCode::Char(_));

    if !alt_gr && key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('p') => {
                app.input_state.history_prev();
                true
            }
            KeyCode::Char('n') => {
                app.input_state.history_next();
                true
            }
            _ => false,
        };
    }
    if !alt_gr && key.modifiers.contains(KeyModifiers::ALT) {
        return false;
    }

    let editable = !app.is_loading();
    match key.code {
        KeyCode::Char(c) => {
            if editable {
                app.input_state.insert(c);
            }
            true
        }
        KeyCode::Backspace if editable => {
            app.input_state.backspace();
            true
        }
        KeyCode::Delete if editable => {
            app.input_state.delete();
            true
        }
        KeyCode::Left => {
            app.input_state.move_left();
            true
        }
        KeyCode::Right => {
            app.input_state.move_right();
            true
        }
        KeyCode::Home => {
            app.input_state.move_home();
            true
        }
        KeyCode::End => {
            app.input_state.move_end();
            true
        }
        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
