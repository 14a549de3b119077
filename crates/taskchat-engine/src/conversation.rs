//! Append-only conversation log.

use crate::message::{Message, Sender};

/// Ordered sequence of messages, oldest first.
///
/// Entries are only ever appended; there is no removal or reordering, so
/// display order always equals insertion order.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation seeded with the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::welcome()],
        }
    }

    /// Append a message to the end of the log.
    pub fn append(&mut self, message: Message) {
        tracing::debug!(id = %message.id, sender = ?message.sender, "append message");
        self.messages.push(message);
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate messages in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages, including the welcome message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the welcome message is present from construction.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Suggested actions of the most recent AI message.
    pub fn latest_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Ai)
            .map(|m| m.suggested_actions.as_slice())
            .unwrap_or_default()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
