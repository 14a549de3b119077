//! Chat session: the conversation log, the composer and the identity
//! that goes with every request.
//!
//! Sending is split into [`ChatSession::begin`] and
//! [`ChatSession::complete`] so an event loop can run the network call on
//! a task in between. [`ChatSession::send`] does all three steps inline.

use crate::composer::{Composer, SubmitRejected};
use crate::conversation::Conversation;
use crate::message::Message;
use crate::session::SessionId;
use crate::transport::{exchange, ChatBackend, ChatRequest};

/// State of one chat session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation: Conversation,
    composer: Composer,
    session_id: SessionId,
    conversation_id: u64,
}

impl ChatSession {
    /// Start a session with a fresh conversation.
    pub fn new(session_id: SessionId, conversation_id: u64) -> Self {
        Self {
            conversation: Conversation::new(),
            composer: Composer::new(),
            session_id,
            conversation_id,
        }
    }

    /// The conversation log.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The composer.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Identity sent as `user_id`.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.composer.is_loading()
    }

    /// Accept `text`, append it as a user message and build the request.
    ///
    /// Nothing is appended when the submission is rejected.
    pub fn begin(&mut self, text: &str) -> Result<ChatRequest, SubmitRejected> {
        let text = self.composer.submit(text)?;
        self.conversation.append(Message::user(text.clone()));
        Ok(ChatRequest {
            message: text,
            user_id: self.session_id.as_str().to_string(),
            conversation_id: self.conversation_id,
        })
    }

    /// Append the reply for the outstanding request and return to idle.
    pub fn complete(&mut self, reply: Message) {
        self.conversation.append(reply);
        self.composer.settle();
    }

    /// Submit `text`, wait for the backend and append its reply.
    ///
    /// Returns the appended AI message. Transport failures still produce a
    /// message (the fixed error text); only rejected submissions are errors.
    pub async fn send(
        &mut self,
        backend: &dyn ChatBackend,
        text: &str,
        base_url: &str,
    ) -> Result<Message, SubmitRejected> {
        let request = self.begin(text)?;
        let reply = exchange(backend, &request, base_url).await;
        self.complete(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use crate::transport::tests::MockBackend;
    use crate::transport::ChatResponse;
    use crate::ToolCall;

    const BASE_URL: &str = "http://localhost:8000";

    fn session() -> ChatSession {
        ChatSession::new(SessionId::new("user_1700000000000"), 1)
    }

    fn groceries_response() -> ChatResponse {
        ChatResponse {
            response: "Added!".into(),
            tool_calls: vec![ToolCall::new("add_task").with_field("title", "Buy groceries")],
            suggested_actions: vec!["List all tasks".into()],
            conversation_id: Some(1),
        }
    }

    #[test]
    fn test_begin_appends_user_message_and_builds_request() {
        let mut chat = session();
        let request = chat.begin("Show pending tasks").unwrap();

        assert_eq!(request.message, "Show pending tasks");
        assert_eq!(request.user_id, "user_1700000000000");
        assert_eq!(request.conversation_id, 1);
        assert!(chat.is_loading());

        let last = chat.conversation().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "Show pending tasks");
    }

    #[test]
    fn test_blank_text_appends_nothing() {
        let mut chat = session();
        assert_eq!(chat.begin("   "), Err(SubmitRejected::Empty));
        assert_eq!(chat.conversation().len(), 1);
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_busy_appends_nothing() {
        let mut chat = session();
        chat.begin("first").unwrap();
        assert_eq!(chat.begin("second"), Err(SubmitRejected::Busy));
        assert_eq!(chat.conversation().len(), 2);
    }

    #[test]
    fn test_complete_settles() {
        let mut chat = session();
        chat.begin("hi").unwrap();
        chat.complete(Message::ai("hello"));
        assert!(!chat.is_loading());
        assert_eq!(chat.conversation().len(), 3);
    }

    #[tokio::test]
    async fn test_successful_send_appends_two_messages() {
        let mut chat = session();
        let backend = MockBackend::replying(groceries_response());

        let reply = chat
            .send(&backend, "Add task: Buy groceries", BASE_URL)
            .await
            .unwrap();
        assert_eq!(reply.text, "Added!");

        let log = chat.conversation().messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].sender, Sender::User);
        assert_eq!(log[1].text, "Add task: Buy groceries");
        assert_eq!(log[2].sender, Sender::Ai);
        assert_eq!(log[2].tool_summaries(), vec!["✅ Added: Buy groceries"]);
        assert!(!chat.is_loading());
        assert_ne!(log[1].id, log[2].id);
    }

    #[tokio::test]
    async fn test_failed_send_appends_one_error_message() {
        let mut chat = session();
        let backend = MockBackend::failing(500);

        chat.send(&backend, "hi", BASE_URL).await.unwrap();

        let log = chat.conversation().messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].sender, Sender::User);
        assert!(log[2].is_transport_error());
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_blank_send_makes_no_request() {
        let mut chat = session();
        let backend = MockBackend::replying(groceries_response());

        assert_eq!(
            chat.send(&backend, "\n", BASE_URL).await.unwrap_err(),
            SubmitRejected::Empty
        );
        assert!(backend.requests.lock().unwrap().is_empty());
        assert_eq!(chat.conversation().len(), 1);
    }
}
