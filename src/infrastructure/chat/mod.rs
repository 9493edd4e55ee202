use crate::domain::language::SpeechLang;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ChatBackendError {
    #[error("chat backend request failed: {0}")]
    Request(String),
    #[error("chat backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    context: ChatContext<'a>,
}

#[derive(Debug, Serialize)]
struct ChatContext<'a> {
    language: &'a str,
}

/// What the assistant backend returns for one turn. The core only reads
/// `response`; suggestions and metadata pass through to the host UI.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The external chat service that produces assistant replies. Out of
/// scope for this crate beyond the wire contract.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(
        &self,
        message: &str,
        session_id: &str,
        language: SpeechLang,
    ) -> Result<ChatReply, ChatBackendError>;
}

pub struct HttpChatBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(
        &self,
        message: &str,
        session_id: &str,
        language: SpeechLang,
    ) -> Result<ChatReply, ChatBackendError> {
        let url = format!("{}/chat", self.base_url.trim_end_matches('/'));

        tracing::info!(
            session_id = %session_id,
            language = %language,
            message_length = message.len(),
            "Sending message to chat backend"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&ChatRequest {
                message,
                session_id,
                context: ChatContext {
                    language: language.as_str(),
                },
            })
            .send()
            .await
            .map_err(|e| ChatBackendError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status, body = %body, "Chat backend returned an error");
            return Err(ChatBackendError::Status { status, body });
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| ChatBackendError::Request(format!("invalid reply body: {}", e)))?;

        tracing::debug!(
            response_length = reply.response.len(),
            suggestion_count = reply.suggestions.len(),
            "Chat backend reply received"
        );

        Ok(reply)
    }
}
