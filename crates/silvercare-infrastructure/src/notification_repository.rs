//! File-backed persistence for the notification store.
//!
//! File location: `{data_dir}/silvercare-notification-store.json`

use std::path::Path;
use version_migrate::Migrator;

use silvercare_core::error::Result;
use silvercare_core::notification::PersistedNotificationFeed;
use silvercare_core::persistence::SnapshotRepository;

use crate::dto::create_notification_migrator;
use crate::paths::NOTIFICATION_STORE_FILE;
use crate::storage::{AtomicFile, read_json};

pub struct FileNotificationRepository {
    file: AtomicFile,
    migrator: Migrator,
}

impl FileNotificationRepository {
    const ENTITY: &'static str = "notification";

    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            file: AtomicFile::new(data_dir.join(NOTIFICATION_STORE_FILE)),
            migrator: create_notification_migrator()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl SnapshotRepository<PersistedNotificationFeed> for FileNotificationRepository {
    fn load(&self) -> Result<Option<PersistedNotificationFeed>> {
        let Some(value) = read_json(&self.file)? else {
            return Ok(None);
        };
        let feed: PersistedNotificationFeed = self.migrator.load_flat_from(Self::ENTITY, value)?;
        Ok(Some(feed))
    }

    fn save(&self, snapshot: &PersistedNotificationFeed) -> Result<()> {
        let serialized = self
            .migrator
            .save_domain_flat(Self::ENTITY, snapshot.clone())?;
        self.file.write(&serialized)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use silvercare_core::notification::{Alert, AlertKind, AlertMetadata, Severity};
    use silvercare_core::telemetry::VitalsSnapshot;
    use silvercare_core::time::invalid_timestamp;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_with_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileNotificationRepository::new(temp_dir.path()).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).unwrap();
        let feed = PersistedNotificationFeed {
            alerts: vec![
                Alert {
                    id: "a1".to_string(),
                    kind: AlertKind::Emergency,
                    title: "응급 상황 발생".to_string(),
                    message: "심박수 이상".to_string(),
                    timestamp: at,
                    read: false,
                    action_required: true,
                    metadata: Some(AlertMetadata {
                        elder_name: Some("김영희".to_string()),
                        location: Some("거실".to_string()),
                        severity: Some(Severity::High),
                        vitals: Some(VitalsSnapshot {
                            heart_rate: 112,
                            blood_pressure: "150/95".to_string(),
                            temperature: 37.1,
                            steps: 800,
                            sleep_hours: 5.5,
                            medication_taken: false,
                            timestamp: at,
                        }),
                    }),
                },
                Alert {
                    id: "a2".to_string(),
                    kind: AlertKind::Reminder,
                    title: "약 복용".to_string(),
                    message: "점심 약".to_string(),
                    timestamp: at - chrono::Duration::hours(2),
                    read: true,
                    action_required: false,
                    metadata: None,
                },
            ],
        };

        repo.save(&feed).unwrap();

        assert_eq!(repo.load().unwrap(), Some(feed));
    }

    #[test]
    fn test_load_none_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileNotificationRepository::new(temp_dir.path()).unwrap();
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_missing_or_null_timestamp_keeps_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileNotificationRepository::new(temp_dir.path()).unwrap();
        let raw = serde_json::json!({
            "version": "1.0.0",
            "notifications": [
                {"id": "a1", "type": "warning", "title": "주의", "message": "혈압 확인"},
                {"id": "a2", "type": "emergency", "title": "응급", "message": "낙상", "timestamp": null},
                {"id": "a3", "type": "reminder", "title": "약", "message": "저녁 약",
                 "timestamp": "2024-03-01T11:00:00.000Z", "read": true}
            ]
        });
        std::fs::write(repo.path(), raw.to_string()).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded.alerts.len(), 3);
        assert_eq!(loaded.alerts[0].timestamp, invalid_timestamp());
        assert_eq!(loaded.alerts[1].timestamp, invalid_timestamp());
        assert!(loaded.alerts[1].action_required);
        assert_eq!(
            loaded.alerts[2].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap()
        );
    }
}
