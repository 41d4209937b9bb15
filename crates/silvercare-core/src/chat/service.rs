//! Port to the remote chat endpoint and its wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::{Message, MessageRole};
use crate::classifier::Sentiment;
use crate::error::Result;
use crate::profile::UserProfile;

/// One prior turn as sent to the endpoint (no id, no timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for HistoryTurn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub sentiment: Sentiment,
    pub action_required: bool,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// The opaque `classifyAndReply` service behind the conversation store.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn classify_and_reply(&self, request: ChatRequest) -> Result<ChatReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest {
            message: "안녕하세요".to_string(),
            conversation_history: vec![HistoryTurn {
                role: MessageRole::Assistant,
                content: "반가워요".to_string(),
            }],
            user_profile: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "안녕하세요");
        assert_eq!(json["conversationHistory"][0]["role"], "assistant");
        assert!(json.get("userProfile").is_none());
    }

    #[test]
    fn test_reply_without_suggestions() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"response":"네","sentiment":"neutral","actionRequired":false}"#,
        )
        .unwrap();
        assert!(reply.suggested_actions.is_empty());
        assert_eq!(reply.sentiment, Sentiment::Neutral);
    }
}
