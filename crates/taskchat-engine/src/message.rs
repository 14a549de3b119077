//! Message records for the conversation log.
//!
//! A [`Message`] is immutable once created. AI messages may carry the
//! structured annotations the backend returns: tool calls describing the
//! actions it took, and suggested follow-up prompts.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Greeting shown as the first entry of every conversation.
pub const WELCOME_TEXT: &str = "🤖 Hello! I'm your AI Todo Assistant powered by Gemini AI. \
I can help you manage tasks with natural language.";

/// Prefix of the message substituted for any transport failure.
pub const TRANSPORT_ERROR_PREFIX: &str =
    "❌ Error connecting to backend. Make sure server is running:";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed or clicked by the person at the keyboard.
    User,
    /// Produced by the backend (or substituted on failure).
    Ai,
}

impl Sender {
    /// Display name used in message headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Ai => "AI Assistant",
        }
    }

    /// Icon used in message headers.
    pub fn icon(self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Ai => "🤖",
        }
    }
}

/// Unique, time-ordered message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Allocate a fresh identifier, strictly greater than any issued before
    /// in this process.
    pub fn new() -> Self {
        static LAST: Mutex<u128> = Mutex::new(0);

        let candidate = Uuid::now_v7().as_u128();
        let mut last = LAST.lock().unwrap_or_else(PoisonError::into_inner);
        // Same-millisecond ids may not sort; bump past the previous one
        *last = candidate.max(*last + 1);
        Self(Uuid::from_u128(*last))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A backend-side action reported alongside a reply.
///
/// `tool` is the tag; every other key of the JSON object is kept in
/// `fields` so unknown tools round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool tag, e.g. `add_task`.
    #[serde(default)]
    pub tool: String,
    /// Tag-specific fields (title, count, `task_id`, status, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ToolCall {
    /// Create a tool call with no extra fields.
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            fields: Map::new(),
        }
    }

    /// Attach a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// One-line human summary, or `None` for tools without one.
    pub fn summary(&self) -> Option<String> {
        match self.tool.as_str() {
            "add_task" => Some(format!("✅ Added: {}", self.title())),
            "list_tasks" => Some(format!("📋 Listed {} tasks", self.count())),
            "complete_task" => Some(format!("☑️ Completed: {}", self.title())),
            "delete_task" => Some(format!("🗑️ Deleted: {}", self.title())),
            "update_task" => Some(format!("✏️ Updated: {}", self.title())),
            _ => None,
        }
    }

    fn title(&self) -> &str {
        self.fields
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Task")
    }

    fn count(&self) -> u64 {
        self.fields.get("count").and_then(Value::as_u64).unwrap_or(0)
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Author.
    pub sender: Sender,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Actions the backend performed (AI messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// One-click follow-up prompts (AI messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
}

impl Message {
    fn new(sender: Sender, text: String) -> Self {
        Self {
            id: MessageId::new(),
            text,
            sender,
            timestamp: Utc::now(),
            tool_calls: Vec::new(),
            suggested_actions: Vec::new(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into())
    }

    /// Create a plain AI message.
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text.into())
    }

    /// Create an AI reply carrying backend annotations.
    pub fn ai_reply(
        text: impl Into<String>,
        tool_calls: Vec<ToolCall>,
        suggested_actions: Vec<String>,
    ) -> Self {
        Self {
            tool_calls,
            suggested_actions,
            ..Self::ai(text)
        }
    }

    /// The synthetic greeting that seeds every conversation.
    pub fn welcome() -> Self {
        Self::ai(WELCOME_TEXT)
    }

    /// The fixed message substituted for a failed exchange.
    pub fn transport_error(base_url: &str) -> Self {
        Self::ai(format!("{TRANSPORT_ERROR_PREFIX} {base_url}"))
    }

    /// Summaries for the tool calls that have one, in order.
    pub fn tool_summaries(&self) -> Vec<String> {
        self.tool_calls.iter().filter_map(ToolCall::summary).collect()
    }

    /// Whether this is the fixed transport error message.
    pub fn is_transport_error(&self) -> bool {
        self.sender == Sender::Ai && self.text.starts_with(TRANSPORT_ERROR_PREFIX)
    }
}
