//! Claude Messages API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use silvercare_core::chat::{HistoryTurn, MessageRole};
use silvercare_core::error::{CareError, Result};

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A hosted model that continues a conversation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the first text block of the reply, or `None` when the reply has no text.
    async fn complete(&self, system: &str, turns: &[HistoryTurn]) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct ClaudeApiClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl ClaudeApiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 1000,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Points the client at a different Messages endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for ClaudeApiClient {
    async fn complete(&self, system: &str, turns: &[HistoryTurn]) -> Result<Option<String>> {
        let body = CreateMessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: turns.iter().map(ApiMessage::from).collect(),
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| CareError::provider(format!("Claude API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Claude error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: CreateMessageResponse = response
            .json()
            .await
            .map_err(|err| CareError::provider(format!("Failed to parse Claude response: {err}")))?;

        Ok(extract_text(parsed))
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a HistoryTurn> for ApiMessage<'a> {
    fn from(turn: &'a HistoryTurn) -> Self {
        let role = match turn.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        Self {
            role,
            content: &turn.content,
        }
    }
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlockResponse {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: CreateMessageResponse) -> Option<String> {
    response.content.into_iter().find_map(|block| match block {
        ContentBlockResponse::Text { text } => Some(text),
        ContentBlockResponse::Other => None,
    })
}

fn map_http_error(status: StatusCode, body: &str) -> CareError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    CareError::provider(format!("Claude API error: {} {}", status.as_u16(), message))
}
