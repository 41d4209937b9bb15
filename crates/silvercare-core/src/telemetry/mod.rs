//! Simulated health telemetry.

pub mod generator;
pub mod model;
pub mod status;
pub mod store;

pub use generator::{RandomVitalsGenerator, VitalsGenerator};
pub use model::{
    HISTORY_LIMIT, PERSISTED_HISTORY_LIMIT, PersistedTelemetry, TelemetryState, VitalsSnapshot,
    VitalsUpdate,
};
pub use status::{VitalStatus, VitalsAssessment};
pub use store::{DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL, TelemetryStore};
