//! [`ChatService`] over HTTP, talking to a running chat proxy.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use silvercare_core::chat::{ChatReply, ChatRequest, ChatService};
use silvercare_core::config::ChatConfig;
use silvercare_core::error::{CareError, Result};

pub const CHAT_PATH: &str = "/api/chat";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";

pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CareError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}{}", endpoint.trim_end_matches('/'), CHAT_PATH),
        })
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatService for HttpChatClient {
    async fn classify_and_reply(&self, request: ChatRequest) -> Result<ChatReply> {
        tracing::debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CareError::transport(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Chat endpoint returned {}", status);
            return Err(CareError::transport(Some(status.as_u16()), SEND_FAILED_MESSAGE));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| CareError::transport(Some(status.as_u16()), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};
    use silvercare_core::classifier::Sentiment;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn request() -> ChatRequest {
        ChatRequest {
            message: "안녕하세요".to_string(),
            conversation_history: Vec::new(),
            user_profile: None,
        }
    }

    #[tokio::test]
    async fn test_posts_request_and_parses_reply() {
        let router = Router::new().route(
            CHAT_PATH,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["message"], "안녕하세요");
                assert!(body["conversationHistory"].is_array());
                Json(json!({
                    "response": "안녕하세요, 어르신!",
                    "sentiment": "positive",
                    "actionRequired": false,
                    "suggestedActions": []
                }))
            }),
        );
        let endpoint = spawn(router).await;
        let client = HttpChatClient::new(&endpoint, Duration::from_secs(5)).unwrap();
        assert!(client.url().ends_with("/api/chat"));
        assert!(!client.url().contains("//api"));

        let reply = client.classify_and_reply(request()).await.unwrap();
        assert_eq!(reply.response, "안녕하세요, 어르신!");
        assert_eq!(reply.sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let router = Router::new().route(
            CHAT_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
            }),
        );
        let endpoint = spawn(router).await;
        let client = HttpChatClient::new(&endpoint, Duration::from_secs(5)).unwrap();

        let err = client.classify_and_reply(request()).await.unwrap_err();
        match err {
            CareError::Transport { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, SEND_FAILED_MESSAGE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpChatClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = client.classify_and_reply(request()).await.unwrap_err();
        assert!(matches!(err, CareError::Transport { status: None, .. }));
    }
}
