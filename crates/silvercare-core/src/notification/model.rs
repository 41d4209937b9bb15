//! Alerts and the notification feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry::VitalsSnapshot;

/// Number of most recent non-Info alerts kept in durable storage.
pub const PERSISTED_ALERT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Transient; auto-dismissed and never persisted.
    Info,
    Warning,
    Emergency,
    Reminder,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Emergency => "emergency",
            AlertKind::Reminder => "reminder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(
        default,
        rename = "healthMetrics",
        skip_serializing_if = "Option::is_none"
    )]
    pub vitals: Option<VitalsSnapshot>,
}

/// A notification in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Only ever moves from false to true.
    pub read: bool,
    pub action_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AlertMetadata>,
}

/// An alert before the store assigns id, time and read state.
///
/// Only constructible through the kind-specific factories, so an emergency
/// always requires action and an info alert never does.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    kind: AlertKind,
    title: String,
    message: String,
    action_required: bool,
    metadata: Option<AlertMetadata>,
}

impl NewAlert {
    fn build(
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        action_required: bool,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_required,
            metadata: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(AlertKind::Info, title, message, false)
    }

    pub fn warning(
        title: impl Into<String>,
        message: impl Into<String>,
        action_required: bool,
    ) -> Self {
        Self::build(AlertKind::Warning, title, message, action_required)
    }

    pub fn emergency(
        title: impl Into<String>,
        message: impl Into<String>,
        metadata: Option<AlertMetadata>,
    ) -> Self {
        Self {
            metadata,
            ..Self::build(AlertKind::Emergency, title, message, true)
        }
    }

    pub fn reminder(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(AlertKind::Reminder, title, message, false)
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action_required(&self) -> bool {
        self.action_required
    }

    pub(crate) fn into_alert(self, id: String, timestamp: DateTime<Utc>) -> Alert {
        Alert {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp,
            read: false,
            action_required: self.action_required,
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeedState {
    /// Newest first.
    pub alerts: Vec<Alert>,
    /// Always equals the number of unread alerts.
    pub unread_count: usize,
}

/// The part of [`NotificationFeedState`] that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedNotificationFeed {
    pub alerts: Vec<Alert>,
}

impl NotificationFeedState {
    pub fn count_unread(alerts: &[Alert]) -> usize {
        alerts.iter().filter(|a| !a.read).count()
    }

    pub fn find(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Newest 20 non-Info alerts. The unread count is derived, not stored.
    pub fn to_persisted(&self) -> PersistedNotificationFeed {
        PersistedNotificationFeed {
            alerts: self
                .alerts
                .iter()
                .filter(|a| a.kind != AlertKind::Info)
                .take(PERSISTED_ALERT_LIMIT)
                .cloned()
                .collect(),
        }
    }

    pub fn from_persisted(persisted: PersistedNotificationFeed) -> Self {
        let unread_count = Self::count_unread(&persisted.alerts);
        Self {
            alerts: persisted.alerts,
            unread_count,
        }
    }
}
