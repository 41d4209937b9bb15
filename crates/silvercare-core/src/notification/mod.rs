//! The alert feed.

pub mod model;
pub mod store;

pub use model::{
    Alert, AlertKind, AlertMetadata, NewAlert, NotificationFeedState, PERSISTED_ALERT_LIMIT,
    PersistedNotificationFeed, Severity,
};
pub use store::{DEFAULT_INFO_AUTO_DISMISS, NotificationStore};
