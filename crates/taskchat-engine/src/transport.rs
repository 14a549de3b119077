//! Transport adapter for the chat backend.
//!
//! One HTTP POST per user message. [`exchange`] is the boundary where
//! failures are absorbed: whatever goes wrong on the wire, the caller gets
//! back an AI message to append, never an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::message::{Message, ToolCall};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub conversation_id: u64,
}

/// Response body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggested_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<u64>,
}

/// Treat an explicit `null` list like a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatResponse {
    /// Convert into the AI message to append.
    pub fn into_message(self) -> Message {
        Message::ai_reply(self.response, self.tool_calls, self.suggested_actions)
    }
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub ai_provider: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub uptime: String,
}

impl HealthReport {
    /// Whether the backend reported itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Errors from a single exchange with the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, I/O or timeout failure.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A chat backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user message and return the decoded reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// HTTP implementation of [`ChatBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query `GET /health`.
    pub async fn health(&self) -> Result<HealthReport, TransportError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(TransportError::Network)?;
        decode_json(response).await
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!(user_id = %request.user_id, "POST /api/chat");
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(TransportError::Network)?;
        decode_json(response).await
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(TransportError::Network)?;
    serde_json::from_slice(&bytes).map_err(TransportError::Decode)
}

/// Perform one exchange and map the outcome onto an AI message.
///
/// Never fails: any transport error is logged and replaced by the fixed
/// error message naming `base_url`.
pub async fn exchange(backend: &dyn ChatBackend, request: &ChatRequest, base_url: &str) -> Message {
    match backend.send(request).await {
        Ok(response) => response.into_message(),
        Err(e) => {
            error!(error = %e, "chat request failed");
            Message::transport_error(base_url)
        }
    }
}
