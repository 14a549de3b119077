//! taskchat-engine: Headless core of the taskchat todo assistant client
//!
//! This crate provides everything except the terminal rendering:
//! - Message model and the append-only conversation log
//! - Persistent session identity
//! - HTTP transport to the chat backend
//! - Composer state machine enforcing one outstanding request
//! - Client configuration

pub mod chat;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod message;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use chat::ChatSession;
pub use composer::{
    Composer, ComposerState, QuickAction, SubmitRejected, EXAMPLE_PROMPTS, QUICK_ACTIONS,
};
pub use config::{default_state_dir, ClientConfig, ConfigError, CONFIG_FILE};
pub use conversation::Conversation;
pub use message::{Message, MessageId, Sender, ToolCall, TRANSPORT_ERROR_PREFIX, WELCOME_TEXT};
pub use session::{LocalStore, SessionId, StoreError, SESSION_KEY};
pub use transport::{
    exchange, ChatBackend, ChatRequest, ChatResponse, HealthReport, HttpBackend, TransportError,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
