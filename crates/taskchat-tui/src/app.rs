//! Application state and update logic for the taskchat TUI.

use std::cell::Cell;

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use taskchat_engine::{ChatRequest, ChatSession, Message, SubmitRejected, QUICK_ACTIONS};
use tracing::{debug, info};

/// Ticks a notification stays visible (about three seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Lines moved per page scroll.
const PAGE_SCROLL: usize = 10;

/// Which part of the screen receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The message input.
    #[default]
    Input,
    /// The quick actions panel.
    QuickActions,
    /// Suggested actions of the latest reply.
    Suggestions,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Conversation, composer and identity.
    pub chat: ChatSession,

    /// Backend base URL (shown in the status bar and error messages).
    pub base_url: String,

    /// Text input state for the message input.
    pub input_state: TextInputState,

    /// Which panel has focus.
    pub focus: Focus,

    /// Selected quick action index.
    pub selected_quick: usize,

    /// Selected suggestion index in the latest reply.
    pub selected_suggestion: usize,

    /// Lines scrolled up from the bottom of the transcript (0 = follow).
    pub transcript_scroll: usize,

    /// Largest useful scroll value, recorded by the last render.
    pub(crate) max_transcript_scroll: Cell<usize>,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Request accepted by the composer but not yet dispatched.
    pending_request: Option<ChatRequest>,
}

impl App {
    /// Create a new app instance.
    pub fn new(chat: ChatSession, base_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            chat,
            base_url: base_url.into(),
            input_state: TextInputState::new(),
            focus: Focus::Input,
            selected_quick: 0,
            selected_suggestion: 0,
            transcript_scroll: 0,
            max_transcript_scroll: Cell::new(usize::MAX),
            tick: 0,
            notification: None,
            notification_ttl: 0,
            pending_request: None,
        }
    }

    /// Whether a reply is outstanding.
    pub fn is_loading(&self) -> bool {
        self.chat.is_loading()
    }

    /// Whether key presses go to the input field.
    pub fn input_has_focus(&self) -> bool {
        self.focus == Focus::Input && !self.show_help
    }

    /// Suggested actions offered by the latest reply.
    pub fn suggestions(&self) -> &[String] {
        self.chat.conversation().latest_suggestions()
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::Back => {
                if self.focus == Focus::Input {
                    self.should_quit = true;
                } else {
                    self.focus = Focus::Input;
                }
            }
            Action::NextFocus => self.cycle_focus(true),
            Action::PrevFocus => self.cycle_focus(false),
            Action::Up => self.move_selection(false),
            Action::Down => self.move_selection(true),
            Action::PageUp => self.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.scroll_down(PAGE_SCROLL),
            Action::QuickAction(index) => {
                if let Some(quick) = QUICK_ACTIONS.get(index) {
                    self.selected_quick = index;
                    self.submit(quick.text);
                }
            }
            Action::Select => self.handle_select(),
            Action::Quit | Action::Help | Action::None => {}
        }
    }

    fn handle_select(&mut self) {
        match self.focus {
            Focus::Input => {
                if self.is_loading() {
                    self.notify_busy();
                    return;
                }
                let text = self.input_state.submit();
                self.submit(&text);
            }
            Focus::QuickActions => {
                if let Some(quick) = QUICK_ACTIONS.get(self.selected_quick) {
                    self.submit(quick.text);
                }
            }
            Focus::Suggestions => {
                if let Some(action) = self.suggestions().get(self.selected_suggestion).cloned() {
                    self.submit(&action);
                }
            }
        }
    }

    /// Submit text through the composer.
    ///
    /// On acceptance the user message is appended and a request is queued
    /// for the event loop to dispatch.
    pub fn submit(&mut self, text: &str) {
        match self.chat.begin(text) {
            Ok(request) => {
                info!(chars = request.message.len(), "submitting message");
                self.pending_request = Some(request);
                self.transcript_scroll = 0;
            }
            Err(SubmitRejected::Empty) => debug!("ignoring blank submission"),
            Err(SubmitRejected::Busy) => self.notify_busy(),
        }
    }

    /// Take the queued request, if any.
    pub fn take_pending_request(&mut self) -> Option<ChatRequest> {
        self.pending_request.take()
    }

    /// Append the reply for the outstanding request.
    pub fn complete(&mut self, reply: Message) {
        self.chat.complete(reply);
        self.selected_suggestion = 0;
        self.transcript_scroll = 0;
        if self.focus == Focus::Suggestions && self.suggestions().is_empty() {
            self.focus = Focus::Input;
        }
    }

    fn notify_busy(&mut self) {
        self.notify(SubmitRejected::Busy.to_string());
    }

    /// Show a transient notification in the status bar.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    fn cycle_focus(&mut self, forward: bool) {
        let has_suggestions = !self.suggestions().is_empty();
        self.focus = match (self.focus, forward) {
            (Focus::Input, true) => Focus::QuickActions,
            (Focus::QuickActions, true) if has_suggestions => Focus::Suggestions,
            (Focus::QuickActions | Focus::Suggestions, true) => Focus::Input,
            (Focus::Input, false) if has_suggestions => Focus::Suggestions,
            (Focus::Input | Focus::Suggestions, false) => Focus::QuickActions,
            (Focus::QuickActions, false) => Focus::Input,
        };
    }

    fn move_selection(&mut self, down: bool) {
        match self.focus {
            Focus::Input => {
                if down {
                    self.scroll_down(1);
                } else {
                    self.scroll_up(1);
                }
            }
            Focus::QuickActions => {
                self.selected_quick = step(self.selected_quick, QUICK_ACTIONS.len(), down);
            }
            Focus::Suggestions => {
                let len = self.suggestions().len();
                self.selected_suggestion = step(self.selected_suggestion, len, down);
            }
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = self
            .transcript_scroll
            .saturating_add(lines)
            .min(self.max_transcript_scroll.get());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Handle a tick event.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Create an app for tests with a fixed session id.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        use taskchat_engine::SessionId;
        Self::new(
            ChatSession::new(SessionId::new("user_1700000000000"), 1),
            "http://localhost:8000",
        )
    }
}

/// Move an index one step within `0..len`, clamping at the ends.
fn step(index: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskchat_engine::{Sender, ToolCall};

    fn reply_with_suggestions() -> Message {
        Message::ai_reply(
            "Added!",
            vec![ToolCall::new("add_task").with_field("title", "Buy groceries")],
            vec!["List all tasks".into(), "Add another task".into()],
        )
    }

    fn type_text(app: &mut App, text: &str) {
        app.input_state.insert_str(text);
    }

    #[test]
    fn test_enter_submits_input() {
        let mut app = App::new_for_test();
        type_text(&mut app, "Show pending tasks");
        app.handle_action(Action::Select);

        assert!(app.is_loading());
        assert!(app.input_state.is_empty());
        let request = app.take_pending_request().unwrap();
        assert_eq!(request.message, "Show pending tasks");
        assert_eq!(request.user_id, "user_1700000000000");
        assert!(app.take_pending_request().is_none());
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let mut app = App::new_for_test();
        type_text(&mut app, "   ");
        app.handle_action(Action::Select);

        assert!(!app.is_loading());
        assert!(app.take_pending_request().is_none());
        assert_eq!(app.chat.conversation().len(), 1);
    }

    #[test]
    fn test_enter_while_loading_keeps_input() {
        let mut app = App::new_for_test();
        app.submit("first");
        type_text(&mut app, "second");
        app.handle_action(Action::Select);

        assert_eq!(app.input_state.content(), "second");
        assert!(app.notification.is_some());
        assert_eq!(app.chat.conversation().len(), 2);
    }

    #[test]
    fn test_quick_action_rejected_while_loading() {
        let mut app = App::new_for_test();
        app.handle_action(Action::QuickAction(0));
        assert_eq!(
            app.take_pending_request().unwrap().message,
            "Add task: Buy groceries"
        );

        app.handle_action(Action::QuickAction(1));
        assert!(app.take_pending_request().is_none());
        assert_eq!(app.chat.conversation().len(), 2);
        assert_eq!(
            app.notification.as_deref(),
            Some("still waiting for the previous reply")
        );
    }

    #[test]
    fn test_complete_returns_to_idle() {
        let mut app = App::new_for_test();
        app.submit("Add task: Buy groceries");
        app.transcript_scroll = 5;
        app.complete(reply_with_suggestions());

        assert!(!app.is_loading());
        assert_eq!(app.transcript_scroll, 0);
        let log = app.chat.conversation().messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[2].sender, Sender::Ai);
    }

    #[test]
    fn test_suggestion_selection_submits() {
        let mut app = App::new_for_test();
        app.submit("Add task: Buy groceries");
        app.complete(reply_with_suggestions());

        app.handle_action(Action::PrevFocus);
        assert_eq!(app.focus, Focus::Suggestions);
        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        assert_eq!(app.selected_suggestion, 1);

        app.handle_action(Action::Select);
        assert_eq!(
            app.take_pending_request().unwrap().message,
            "Add another task"
        );
    }

    #[test]
    fn test_quick_actions_panel_navigation() {
        let mut app = App::new_for_test();
        app.handle_action(Action::NextFocus);
        assert_eq!(app.focus, Focus::QuickActions);

        for _ in 0..10 {
            app.handle_action(Action::Down);
        }
        assert_eq!(app.selected_quick, QUICK_ACTIONS.len() - 1);

        app.handle_action(Action::Select);
        assert_eq!(
            app.take_pending_request().unwrap().message,
            QUICK_ACTIONS[3].text
        );
    }

    #[test]
    fn test_focus_cycle_skips_suggestions_when_none() {
        let mut app = App::new_for_test();
        app.handle_action(Action::NextFocus);
        app.handle_action(Action::NextFocus);
        assert_eq!(app.focus, Focus::Input);

        app.handle_action(Action::PrevFocus);
        assert_eq!(app.focus, Focus::QuickActions);
    }

    #[test]
    fn test_back_returns_focus_then_quits() {
        let mut app = App::new_for_test();
        app.focus = Focus::QuickActions;
        app.handle_action(Action::Back);
        assert_eq!(app.focus, Focus::Input);
        assert!(!app.should_quit);

        app.handle_action(Action::Back);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_closes_before_quit() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = App::new_for_test();
        app.max_transcript_scroll.set(3);
        app.handle_action(Action::PageUp);
        assert_eq!(app.transcript_scroll, 3);

        app.handle_action(Action::Down);
        assert_eq!(app.transcript_scroll, 2);
        app.handle_action(Action::PageDown);
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_notification_expires() {
        let mut app = App::new_for_test();
        app.notify("hello");
        for _ in 0..NOTIFICATION_TICKS {
            app.tick();
        }
        assert!(app.notification.is_none());
    }
}
