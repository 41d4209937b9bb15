//! File-backed persistence for the telemetry store.
//!
//! File location: `{data_dir}/silvercare-health-store.json`

use std::path::Path;
use version_migrate::Migrator;

use silvercare_core::error::Result;
use silvercare_core::persistence::SnapshotRepository;
use silvercare_core::telemetry::PersistedTelemetry;

use crate::dto::create_health_migrator;
use crate::paths::HEALTH_STORE_FILE;
use crate::storage::{AtomicFile, read_json};

pub struct FileHealthRepository {
    file: AtomicFile,
    migrator: Migrator,
}

impl FileHealthRepository {
    const ENTITY: &'static str = "health";

    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            file: AtomicFile::new(data_dir.join(HEALTH_STORE_FILE)),
            migrator: create_health_migrator()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl SnapshotRepository<PersistedTelemetry> for FileHealthRepository {
    fn load(&self) -> Result<Option<PersistedTelemetry>> {
        let Some(value) = read_json(&self.file)? else {
            return Ok(None);
        };
        let telemetry: PersistedTelemetry = self.migrator.load_flat_from(Self::ENTITY, value)?;
        Ok(Some(telemetry))
    }

    fn save(&self, snapshot: &PersistedTelemetry) -> Result<()> {
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
    use silvercare_core::telemetry::VitalsSnapshot;
    use silvercare_core::time::invalid_timestamp;
    use tempfile::TempDir;

    fn reading(minute: u32) -> VitalsSnapshot {
        VitalsSnapshot {
            heart_rate: 70 + minute,
            blood_pressure: "128/82".to_string(),
            temperature: 36.6,
            steps: 3200,
            sleep_hours: 6.8,
            medication_taken: minute % 2 == 0,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileHealthRepository::new(temp_dir.path()).unwrap();
        let telemetry = PersistedTelemetry {
            current: Some(reading(2)),
            history: vec![reading(0), reading(1), reading(2)],
        };

        repo.save(&telemetry).unwrap();

        assert_eq!(repo.load().unwrap(), Some(telemetry));
    }

    #[test]
    fn test_empty_history_without_current() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileHealthRepository::new(temp_dir.path()).unwrap();

        repo.save(&PersistedTelemetry::default()).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert!(loaded.current.is_none());
        assert!(loaded.history.is_empty());
    }

    fn vitals_json(timestamp: Option<serde_json::Value>) -> serde_json::Value {
        let mut value = serde_json::json!({
            "heartRate": 72,
            "bloodPressure": "128/82",
            "temperature": 36.6,
            "steps": 3200,
            "sleepHours": 6.8,
            "medicationTaken": true
        });
        if let Some(timestamp) = timestamp {
            value["timestamp"] = timestamp;
        }
        value
    }

    #[test]
    fn test_missing_or_null_timestamp_keeps_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileHealthRepository::new(temp_dir.path()).unwrap();
        let raw = serde_json::json!({
            "version": "1.0.0",
            "currentMetrics": vitals_json(Some(serde_json::Value::Null)),
            "history": [
                vitals_json(None),
                vitals_json(Some(serde_json::Value::Null)),
                vitals_json(Some(serde_json::json!("2024-03-01T08:02:00.000Z")))
            ]
        });
        std::fs::write(repo.path(), raw.to_string()).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded.current.unwrap().timestamp, invalid_timestamp());
        assert_eq!(loaded.history.len(), 3);
        assert_eq!(loaded.history[0].timestamp, invalid_timestamp());
        assert_eq!(loaded.history[1].timestamp, invalid_timestamp());
        assert_eq!(loaded.history[2], reading(2));
    }
}
