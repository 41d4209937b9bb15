//! Telemetry store DTOs.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use silvercare_core::telemetry::{PersistedTelemetry, VitalsSnapshot};

use super::{decode_timestamp, encode_timestamp};

/// Vitals snapshot DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshotV1_0_0 {
    pub heart_rate: u32,
    pub blood_pressure: String,
    pub temperature: f64,
    pub steps: u32,
    pub sleep_hours: f64,
    pub medication_taken: bool,
    #[serde(default, deserialize_with = "super::lenient_timestamp")]
    pub timestamp: Option<String>,
}

impl From<&VitalsSnapshot> for VitalsSnapshotV1_0_0 {
    fn from(v: &VitalsSnapshot) -> Self {
        VitalsSnapshotV1_0_0 {
            heart_rate: v.heart_rate,
            blood_pressure: v.blood_pressure.clone(),
            temperature: v.temperature,
            steps: v.steps,
            sleep_hours: v.sleep_hours,
            medication_taken: v.medication_taken,
            timestamp: encode_timestamp(&v.timestamp),
        }
    }
}

impl From<VitalsSnapshotV1_0_0> for VitalsSnapshot {
    fn from(dto: VitalsSnapshotV1_0_0) -> Self {
        VitalsSnapshot {
            timestamp: decode_timestamp(dto.timestamp.as_deref()),
            heart_rate: dto.heart_rate,
            blood_pressure: dto.blood_pressure,
            temperature: dto.temperature,
            steps: dto.steps,
            sleep_hours: dto.sleep_hours,
            medication_taken: dto.medication_taken,
        }
    }
}

/// Persisted telemetry DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct HealthStoreV1_0_0 {
    #[serde(default)]
    pub current_metrics: Option<VitalsSnapshotV1_0_0>,
    #[serde(default)]
    pub history: Vec<VitalsSnapshotV1_0_0>,
}

impl IntoDomain<PersistedTelemetry> for HealthStoreV1_0_0 {
    fn into_domain(self) -> PersistedTelemetry {
        PersistedTelemetry {
            current: self.current_metrics.map(VitalsSnapshot::from),
            history: self.history.into_iter().map(VitalsSnapshot::from).collect(),
        }
    }
}

impl FromDomain<PersistedTelemetry> for HealthStoreV1_0_0 {
    fn from_domain(telemetry: PersistedTelemetry) -> Self {
        HealthStoreV1_0_0 {
            current_metrics: telemetry.current.as_ref().map(VitalsSnapshotV1_0_0::from),
            history: telemetry.history.iter().map(VitalsSnapshotV1_0_0::from).collect(),
        }
    }
}

/// Creates a Migrator for the persisted telemetry.
pub fn create_health_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("health")
        .from::<HealthStoreV1_0_0>()
        .into_with_save::<PersistedTelemetry>();
    migrator.register(path)?;
    Ok(migrator)
}
