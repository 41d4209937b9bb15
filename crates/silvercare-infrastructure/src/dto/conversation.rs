//! Conversation store DTOs.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use silvercare_core::chat::{Message, MessageRole, PersistedConversation};
use silvercare_core::classifier::Sentiment;

use super::{decode_timestamp, encode_timestamp};

/// Message DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageV1_0_0 {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl From<&Message> for MessageV1_0_0 {
    fn from(message: &Message) -> Self {
        MessageV1_0_0 {
            id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            timestamp: encode_timestamp(&message.timestamp),
            sentiment: message.sentiment,
        }
    }
}

impl From<MessageV1_0_0> for Message {
    fn from(dto: MessageV1_0_0) -> Self {
        Message {
            timestamp: decode_timestamp(dto.timestamp.as_deref()),
            id: dto.id,
            role: dto.role,
            content: dto.content,
            sentiment: dto.sentiment,
        }
    }
}

/// Persisted conversation DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConversationStoreV1_0_0 {
    #[serde(default)]
    pub messages: Vec<MessageV1_0_0>,
}

impl IntoDomain<PersistedConversation> for ConversationStoreV1_0_0 {
    fn into_domain(self) -> PersistedConversation {
        PersistedConversation {
            messages: self.messages.into_iter().map(Message::from).collect(),
        }
    }
}

impl FromDomain<PersistedConversation> for ConversationStoreV1_0_0 {
    fn from_domain(conversation: PersistedConversation) -> Self {
        ConversationStoreV1_0_0 {
            messages: conversation.messages.iter().map(MessageV1_0_0::from).collect(),
        }
    }
}

/// Creates a Migrator for the persisted conversation.
pub fn create_conversation_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("conversation")
        .from::<ConversationStoreV1_0_0>()
        .into_with_save::<PersistedConversation>();
    migrator.register(path)?;
    Ok(migrator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvercare_core::time::invalid_timestamp;

    #[test]
    fn test_bad_timestamp_becomes_sentinel() {
        let dto = MessageV1_0_0 {
            id: "m1".to_string(),
            role: MessageRole::User,
            content: "안녕".to_string(),
            timestamp: Some("not a date".to_string()),
            sentiment: None,
        };

        let message = Message::from(dto);
        assert_eq!(message.timestamp, invalid_timestamp());
        assert_eq!(message.content, "안녕");
    }

    #[test]
    fn test_missing_or_null_timestamp_becomes_sentinel() {
        for json in [
            serde_json::json!({"id": "m1", "role": "user", "content": "안녕"}),
            serde_json::json!({"id": "m1", "role": "user", "content": "안녕", "timestamp": null}),
            serde_json::json!({"id": "m1", "role": "user", "content": "안녕", "timestamp": 42}),
        ] {
            let dto: MessageV1_0_0 = serde_json::from_value(json).unwrap();
            assert_eq!(dto.timestamp, None);
            assert_eq!(Message::from(dto).timestamp, invalid_timestamp());
        }
    }

    #[test]
    fn test_timestamp_encoding_is_utc_millis() {
        let ts = silvercare_core::time::parse_timestamp("2024-03-01T09:30:15.250+09:00").unwrap();
        assert_eq!(encode_timestamp(&ts).as_deref(), Some("2024-03-01T00:30:15.250Z"));
    }
}
