//! Composer state machine.
//!
//! Two states: [`ComposerState::Idle`] and [`ComposerState::AwaitingResponse`].
//! A submission is accepted only from `Idle` with non-blank text, and the
//! composer returns to `Idle` when the request settles, whatever its
//! outcome. Quick actions and suggested actions go through the same
//! [`Composer::submit`] path, so at most one request is ever outstanding.

use thiserror::Error;

/// A canned prompt offered in the quick actions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub text: &'static str,
    pub emoji: &'static str,
}

/// Prompts available as one-key quick actions.
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        text: "Add task: Buy groceries",
        emoji: "🛒",
    },
    QuickAction {
        text: "Show pending tasks",
        emoji: "📋",
    },
    QuickAction {
        text: "List all my tasks",
        emoji: "📝",
    },
    QuickAction {
        text: "Add: Complete project by Friday",
        emoji: "🎯",
    },
];

/// Example phrasings shown in the sidebar.
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Add task to complete project",
    "Show me pending tasks",
    "Mark task 3 as complete",
    "Delete the shopping task",
];

/// Composer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerState {
    /// Ready to accept a submission.
    #[default]
    Idle,
    /// One request is outstanding.
    AwaitingResponse,
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// The text was empty or whitespace only.
    #[error("message is empty")]
    Empty,
    /// A request is already outstanding.
    #[error("still waiting for the previous reply")]
    Busy,
}

/// Tracks whether a request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    state: ComposerState,
}

impl Composer {
    /// Create an idle composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Whether the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        self.state == ComposerState::AwaitingResponse
    }

    /// Accept `text` for sending and move to `AwaitingResponse`.
    ///
    /// Returns the text to send unchanged; trimming is only used for the
    /// emptiness check.
    pub fn submit(&mut self, text: &str) -> Result<String, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.is_loading() {
            return Err(SubmitRejected::Busy);
        }
        self.state = ComposerState::AwaitingResponse;
        Ok(text.to_string())
    }

    /// The outstanding request finished, successfully or not.
    pub fn settle(&mut self) {
        self.state = ComposerState::Idle;
    }
}
