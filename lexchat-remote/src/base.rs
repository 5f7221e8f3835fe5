//! Base trait for the remote chat service

use async_trait::async_trait;
use lexchat_core::session::Message;
use thiserror::Error;

/// Error type for remote service calls
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The service could not be reached or the transfer failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The body decoded but does not satisfy the contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    /// True when the service reported the requested resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Status { status: 404, .. })
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Chat service contract: session issuance, answering and log persistence
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Ask the service for a fresh session identifier
    async fn new_chat(&self) -> RemoteResult<String>;

    /// Send one query within a session and return the reply text
    async fn process_query(&self, query: &str, session_id: &str) -> RemoteResult<String>;

    /// Store the full ordered log for a session
    async fn save_chat(&self, session_id: &str, messages: &[Message]) -> RemoteResult<()>;

    /// Fetch the stored log for a session
    async fn chat_history(&self, session_id: &str) -> RemoteResult<Vec<Message>>;
}
