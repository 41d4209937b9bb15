//! Sources of simulated vitals.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::model::VitalsSnapshot;

/// Produces one vitals snapshot per call.
pub trait VitalsGenerator: Send + Sync {
    fn generate(&self, at: DateTime<Utc>) -> VitalsSnapshot;
}

/// Uniformly random vitals within plausible resting ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomVitalsGenerator;

impl VitalsGenerator for RandomVitalsGenerator {
    fn generate(&self, at: DateTime<Utc>) -> VitalsSnapshot {
        let mut rng = rand::thread_rng();
        let systolic = rng.gen_range(110..150);
        let diastolic = rng.gen_range(70..90);

        VitalsSnapshot {
            heart_rate: rng.gen_range(60..100),
            blood_pressure: format!("{}/{}", systolic, diastolic),
            temperature: round_tenth(rng.gen_range(36.0..37.5)),
            steps: rng.gen_range(1000..11000),
            sleep_hours: round_tenth(rng.gen_range(6.0..9.0)),
            medication_taken: rng.gen_bool(0.7),
            timestamp: at,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
