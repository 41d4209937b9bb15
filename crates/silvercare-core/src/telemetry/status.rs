//! Traffic-light classification of individual vitals.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::VitalsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    Normal,
    Caution,
    Critical,
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VitalStatus::Normal => "정상",
            VitalStatus::Caution => "주의",
            VitalStatus::Critical => "위험",
        };
        write!(f, "{}", label)
    }
}

impl VitalStatus {
    pub fn heart_rate(bpm: u32) -> Self {
        if !(60..=100).contains(&bpm) {
            VitalStatus::Critical
        } else if !(70..=90).contains(&bpm) {
            VitalStatus::Caution
        } else {
            VitalStatus::Normal
        }
    }

    pub fn temperature(celsius: f64) -> Self {
        if !(36.0..=37.5).contains(&celsius) {
            VitalStatus::Critical
        } else if !(36.2..=37.2).contains(&celsius) {
            VitalStatus::Caution
        } else {
            VitalStatus::Normal
        }
    }

    pub fn steps(steps: u32) -> Self {
        match steps {
            0..2000 => VitalStatus::Critical,
            2000..5000 => VitalStatus::Caution,
            _ => VitalStatus::Normal,
        }
    }

    /// Sleep is never critical, only outside 6 to 9 hours.
    pub fn sleep(hours: f64) -> Self {
        if (6.0..=9.0).contains(&hours) {
            VitalStatus::Normal
        } else {
            VitalStatus::Caution
        }
    }
}

/// Per-metric status for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsAssessment {
    pub heart_rate: VitalStatus,
    pub temperature: VitalStatus,
    pub steps: VitalStatus,
    pub sleep: VitalStatus,
}

impl VitalsAssessment {
    pub fn of(snapshot: &VitalsSnapshot) -> Self {
        Self {
            heart_rate: VitalStatus::heart_rate(snapshot.heart_rate),
            temperature: VitalStatus::temperature(snapshot.temperature),
            steps: VitalStatus::steps(snapshot.steps),
            sleep: VitalStatus::sleep(snapshot.sleep_hours),
        }
    }

    /// The worst individual status.
    pub fn overall(&self) -> VitalStatus {
        [self.heart_rate, self.temperature, self.steps, self.sleep]
            .into_iter()
            .max()
            .unwrap_or(VitalStatus::Normal)
    }
}
