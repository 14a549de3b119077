//! Event handling for the taskchat TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Terminal events forwarded from a polling thread.
///
/// The thread emits [`Event::Tick`] whenever `tick_rate` passes without
/// input and stops once the receiver is dropped.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start polling with a tick every `tick_rate_ms` milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);
        std::thread::spawn(move || poll_terminal(&tx, tick_rate));
        Self { rx }
    }

    /// Wait for the next event. `None` once the polling thread has exited.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

fn poll_terminal(tx: &mpsc::UnboundedSender<Event>, tick_rate: Duration) {
    loop {
        let event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(raw) => translate(raw),
                Err(_) => None,
            },
            Ok(false) => Some(Event::Tick),
            Err(_) => return,
        };
        if let Some(event) = event {
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        // Windows reports releases too; only presses edit the input
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    Back,
    Select,
    Up,
    Down,
    PageUp,
    PageDown,
    NextFocus,
    PrevFocus,
    QuickAction(usize),
    None,
}

/// Convert a key event to an action.
///
/// Printable keys are consumed by the input field before this is called
/// whenever it has focus, so plain letters here only apply to the panels.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            return Action::QuickAction(c as usize - '1' as usize);
        }
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => Action::Help,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Select,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::BackTab => Action::PrevFocus,
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                Action::PrevFocus
            } else {
                Action::NextFocus
            }
        }
        _ => Action::None,
    }
}
