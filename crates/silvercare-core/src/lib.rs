//! Domain core of SilverCare: the three stores, the message classifier and
//! the ports they talk to.

pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod notification;
pub mod persistence;
pub mod profile;
pub mod telemetry;
pub mod time;

// Re-export common error type
pub use error::{CareError, Result};
