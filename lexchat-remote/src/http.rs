//! HTTP client for the chat service

use async_trait::async_trait;
use lexchat_core::config::ServiceConfig;
use lexchat_core::session::Message;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::base::{ChatService, RemoteError, RemoteResult};

#[derive(Debug, Deserialize)]
struct NewChatResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    session_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    chat_history: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Chat service reached over HTTP with JSON payloads
pub struct HttpChatService {
    client: Client,
    base_url: String,
}

impl HttpChatService {
    /// Create a client for `base_url`. Without a timeout, requests wait for
    /// as long as the transport allows.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> RemoteResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> RemoteResult<Self> {
        Self::new(
            config.base_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_url(&self, route: &str, session_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            route,
            urlencoding::encode(session_id)
        )
    }
}

/// Turn a non-success response into a `RemoteError::Status`, pulling the
/// `detail` field out of FastAPI-style error bodies when present.
pub(crate) async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    Err(RemoteError::Status {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn new_chat(&self) -> RemoteResult<String> {
        let url = format!("{}/new_chat", self.base_url);
        debug!("Requesting new chat session from {}", url);

        let response = check_status(self.client.post(&url).send().await?).await?;
        let data: NewChatResponse = response.json().await?;

        if data.session_id.trim().is_empty() {
            return Err(RemoteError::InvalidResponse(
                "service returned an empty session_id".to_string(),
            ));
        }
        Ok(data.session_id)
    }

    async fn process_query(&self, query: &str, session_id: &str) -> RemoteResult<String> {
        let url = format!("{}/process_query", self.base_url);
        debug!("Sending query for session {}", session_id);

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query, session_id })
            .send()
            .await?;
        let data: QueryResponse = check_status(response).await?.json().await?;
        Ok(data.response)
    }

    async fn save_chat(&self, session_id: &str, messages: &[Message]) -> RemoteResult<()> {
        let url = self.session_url("save_chat", session_id);
        debug!("Saving {} messages for session {}", messages.len(), session_id);

        let response = self.client.post(&url).json(messages).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn chat_history(&self, session_id: &str) -> RemoteResult<Vec<Message>> {
        let url = self.session_url("get_chat_history", session_id);
        debug!("Fetching history for session {}", session_id);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let data: HistoryResponse = response.json().await?;
        Ok(data.chat_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> HttpChatService {
        HttpChatService::new(format!("{}/", server.url()), None).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = HttpChatService::new("http://localhost:8000///", None).unwrap();
        assert_eq!(service.base_url(), "http://localhost:8000");
        assert_eq!(
            service.session_url("save_chat", "a b"),
            "http://localhost:8000/save_chat/a%20b"
        );
    }

    #[tokio::test]
    async fn test_new_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/new_chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session_id":"s1"}"#)
            .create_async()
            .await;

        let id = client(&server).new_chat().await.unwrap();
        assert_eq!(id, "s1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_new_chat_rejects_empty_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/new_chat")
            .with_status(200)
            .with_body(r#"{"session_id":""}"#)
            .create_async()
            .await;

        let err = client(&server).new_chat().await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_process_query_sends_query_and_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/process_query")
            .match_body(Matcher::Json(json!({
                "query": "What is tort law?",
                "session_id": "s1"
            })))
            .with_status(200)
            .with_body(r#"{"response":"A civil wrong.","session_id":"s1"}"#)
            .create_async()
            .await;

        let reply = client(&server)
            .process_query("What is tort law?", "s1")
            .await
            .unwrap();
        assert_eq!(reply, "A civil wrong.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_query_error_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/process_query")
            .with_status(400)
            .with_body(r#"{"detail":"Session ID is required."}"#)
            .create_async()
            .await;

        let err = client(&server).process_query("hi", "").await.unwrap_err();
        match err {
            RemoteError::Status { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Session ID is required.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_save_chat_posts_ordered_log() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/save_chat/s1")
            .match_body(Matcher::Json(json!([
                {"sender": "Human", "content": "q"},
                {"sender": "AI", "content": "a"}
            ])))
            .with_status(200)
            .with_body(r#"{"message":"Chat history saved successfully"}"#)
            .create_async()
            .await;

        client(&server)
            .save_chat("s1", &[Message::human("q"), Message::agent("a")])
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_history() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_chat_history/s1")
            .with_status(200)
            .with_body(
                r#"{"chat_history":[{"sender":"Human","content":"q"},{"sender":"AI","content":"a"}]}"#,
            )
            .create_async()
            .await;

        let history = client(&server).chat_history("s1").await.unwrap();
        assert_eq!(history, vec![Message::human("q"), Message::agent("a")]);
    }

    #[tokio::test]
    async fn test_chat_history_without_history_field_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_chat_history/s1")
            .with_status(200)
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        let result = client(&server).chat_history("s1").await;
        assert!(matches!(result, Err(RemoteError::Http(_))));
    }

    #[tokio::test]
    async fn test_chat_history_unknown_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_chat_history/missing")
            .with_status(404)
            .with_body(r#"{"detail":"Session ID not found."}"#)
            .create_async()
            .await;

        let err = client(&server).chat_history("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let service = HttpChatService::new("http://127.0.0.1:1", None).unwrap();
        let err = service.new_chat().await.unwrap_err();
        assert!(matches!(err, RemoteError::Http(_)));
    }
}
