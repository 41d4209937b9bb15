//! Notification store DTOs.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use silvercare_core::notification::{
    Alert, AlertKind, AlertMetadata, PersistedNotificationFeed, Severity,
};
use silvercare_core::telemetry::VitalsSnapshot;

use super::telemetry::VitalsSnapshotV1_0_0;
use super::{decode_timestamp, encode_timestamp};

/// Alert metadata DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMetadataV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_metrics: Option<VitalsSnapshotV1_0_0>,
}

impl From<&AlertMetadata> for AlertMetadataV1_0_0 {
    fn from(m: &AlertMetadata) -> Self {
        AlertMetadataV1_0_0 {
            elder_name: m.elder_name.clone(),
            location: m.location.clone(),
            severity: m.severity,
            health_metrics: m.vitals.as_ref().map(VitalsSnapshotV1_0_0::from),
        }
    }
}

impl From<AlertMetadataV1_0_0> for AlertMetadata {
    fn from(dto: AlertMetadataV1_0_0) -> Self {
        AlertMetadata {
            elder_name: dto.elder_name,
            location: dto.location,
            severity: dto.severity,
            vitals: dto.health_metrics.map(VitalsSnapshot::from),
        }
    }
}

/// Alert DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertV1_0_0 {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AlertMetadataV1_0_0>,
}

impl From<&Alert> for AlertV1_0_0 {
    fn from(alert: &Alert) -> Self {
        AlertV1_0_0 {
            id: alert.id.clone(),
            kind: alert.kind,
            title: alert.title.clone(),
            message: alert.message.clone(),
            timestamp: encode_timestamp(&alert.timestamp),
            read: alert.read,
            action_required: alert.action_required,
            metadata: alert.metadata.as_ref().map(AlertMetadataV1_0_0::from),
        }
    }
}

impl From<AlertV1_0_0> for Alert {
    fn from(dto: AlertV1_0_0) -> Self {
        Alert {
            timestamp: decode_timestamp(dto.timestamp.as_deref()),
            // Emergencies always require action, whatever the file says.
            action_required: dto.action_required || dto.kind == AlertKind::Emergency,
            id: dto.id,
            kind: dto.kind,
            title: dto.title,
            message: dto.message,
            read: dto.read,
            metadata: dto.metadata.map(AlertMetadata::from),
        }
    }
}

/// Persisted alert feed DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct NotificationStoreV1_0_0 {
    #[serde(default)]
    pub notifications: Vec<AlertV1_0_0>,
}

impl IntoDomain<PersistedNotificationFeed> for NotificationStoreV1_0_0 {
    fn into_domain(self) -> PersistedNotificationFeed {
        PersistedNotificationFeed {
            alerts: self.notifications.into_iter().map(Alert::from).collect(),
        }
    }
}

impl FromDomain<PersistedNotificationFeed> for NotificationStoreV1_0_0 {
    fn from_domain(feed: PersistedNotificationFeed) -> Self {
        NotificationStoreV1_0_0 {
            notifications: feed.alerts.iter().map(AlertV1_0_0::from).collect(),
        }
    }
}

/// Creates a Migrator for the persisted alert feed.
pub fn create_notification_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("notification")
        .from::<NotificationStoreV1_0_0>()
        .into_with_save::<PersistedNotificationFeed>();
    migrator.register(path)?;
    Ok(migrator)
}
