//! Vitals snapshots and telemetry state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on in-memory history.
pub const HISTORY_LIMIT: usize = 100;

/// Number of history entries kept in durable storage.
pub const PERSISTED_HISTORY_LIMIT: usize = 50;

/// One reading of the simulated health metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshot {
    /// Beats per minute.
    pub heart_rate: u32,
    /// "systolic/diastolic", e.g. "120/80".
    pub blood_pressure: String,
    /// Degrees Celsius, one decimal.
    pub temperature: f64,
    pub steps: u32,
    /// One decimal.
    pub sleep_hours: f64,
    pub medication_taken: bool,
    pub timestamp: DateTime<Utc>,
}

/// Partial override applied by `update_metrics`. The timestamp is always refreshed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsUpdate {
    pub heart_rate: Option<u32>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<f64>,
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub medication_taken: Option<bool>,
}

impl VitalsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge over `base`, stamped with `at`.
    pub fn apply(&self, base: &VitalsSnapshot, at: DateTime<Utc>) -> VitalsSnapshot {
        VitalsSnapshot {
            heart_rate: self.heart_rate.unwrap_or(base.heart_rate),
            blood_pressure: self
                .blood_pressure
                .clone()
                .unwrap_or_else(|| base.blood_pressure.clone()),
            temperature: self.temperature.unwrap_or(base.temperature),
            steps: self.steps.unwrap_or(base.steps),
            sleep_hours: self.sleep_hours.unwrap_or(base.sleep_hours),
            medication_taken: self.medication_taken.unwrap_or(base.medication_taken),
            timestamp: at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryState {
    pub current: Option<VitalsSnapshot>,
    /// Oldest first. Never longer than [`HISTORY_LIMIT`].
    pub history: Vec<VitalsSnapshot>,
    pub is_simulating: bool,
}

/// The part of [`TelemetryState`] that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedTelemetry {
    pub current: Option<VitalsSnapshot>,
    pub history: Vec<VitalsSnapshot>,
}

impl TelemetryState {
    /// Makes `snapshot` current and appends it, evicting the oldest past the cap.
    pub fn push(&mut self, snapshot: VitalsSnapshot) {
        self.current = Some(snapshot.clone());
        self.history.push(snapshot);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    pub fn to_persisted(&self) -> PersistedTelemetry {
        let skip = self.history.len().saturating_sub(PERSISTED_HISTORY_LIMIT);
        PersistedTelemetry {
            current: self.current.clone(),
            history: self.history[skip..].to_vec(),
        }
    }

    /// The simulation flag never survives a restart.
    pub fn from_persisted(persisted: PersistedTelemetry) -> Self {
        let mut history = persisted.history;
        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }
        Self {
            current: persisted.current,
            history,
            is_simulating: false,
        }
    }
}
