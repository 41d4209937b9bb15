//! Versioned persistence schemas.
//!
//! DTOs are private to the infrastructure layer. Timestamps are stored as
//! RFC 3339 strings and rebuilt on load; a timestamp that is missing, null,
//! not a string or no longer parses becomes the epoch sentinel instead of
//! failing the whole file.
//!
//! ### Version History
//! - **1.0.0**: Initial schema for all three stores

mod conversation;
mod notification;
mod telemetry;

pub use conversation::{ConversationStoreV1_0_0, MessageV1_0_0, create_conversation_migrator};
pub use notification::{
    AlertMetadataV1_0_0, AlertV1_0_0, NotificationStoreV1_0_0, create_notification_migrator,
};
pub use telemetry::{HealthStoreV1_0_0, VitalsSnapshotV1_0_0, create_health_migrator};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use silvercare_core::time::{invalid_timestamp, parse_timestamp_or_sentinel};

pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> Option<String> {
    Some(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub(crate) fn decode_timestamp(value: Option<&str>) -> DateTime<Utc> {
    match value {
        Some(value) => parse_timestamp_or_sentinel(value),
        None => invalid_timestamp(),
    }
}

/// Accepts any JSON value for a timestamp field; only strings are kept.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Some(value),
        _ => None,
    })
}
