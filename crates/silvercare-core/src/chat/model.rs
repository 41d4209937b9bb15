//! Conversation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Sentiment;

/// Number of most recent messages kept in durable storage.
pub const PERSISTED_MESSAGE_LIMIT: usize = 50;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single conversational turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// A message before the store stamps it with an id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub role: MessageRole,
    pub content: String,
    pub sentiment: Option<Sentiment>,
}

impl MessageDraft {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            sentiment: None,
        }
    }

    pub fn assistant(content: impl Into<String>, sentiment: Option<Sentiment>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            sentiment,
        }
    }
}

/// Live state of the conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    /// Chronological; insertion order is temporal order.
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The part of [`ConversationState`] that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConversation {
    pub messages: Vec<Message>,
}

impl ConversationState {
    pub fn to_persisted(&self) -> PersistedConversation {
        let skip = self.messages.len().saturating_sub(PERSISTED_MESSAGE_LIMIT);
        PersistedConversation {
            messages: self.messages[skip..].to_vec(),
        }
    }

    /// Loading and error flags always start cleared.
    pub fn from_persisted(persisted: PersistedConversation) -> Self {
        Self {
            messages: persisted.messages,
            is_loading: false,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(n: usize) -> Message {
        Message {
            id: format!("m{}", n),
            role: MessageRole::User,
            content: format!("message {}", n),
            timestamp: Utc::now(),
            sentiment: None,
        }
    }

    #[test]
    fn test_to_persisted_keeps_last_fifty() {
        let state = ConversationState {
            messages: (0..75).map(message).collect(),
            ..Default::default()
        };

        let persisted = state.to_persisted();
        assert_eq!(persisted.messages.len(), PERSISTED_MESSAGE_LIMIT);
        assert_eq!(persisted.messages[0].id, "m25");
        assert_eq!(persisted.messages.last().unwrap().id, "m74");
    }

    #[test]
    fn test_from_persisted_clears_flags() {
        let state = ConversationState::from_persisted(PersistedConversation {
            messages: vec![message(1)],
        });
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.messages.len(), 1);
    }
}
