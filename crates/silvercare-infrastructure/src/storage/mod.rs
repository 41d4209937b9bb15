//! File storage primitives.

pub mod atomic_file;

pub use atomic_file::{AtomicFile, StorageError};

use silvercare_core::error::Result;

/// Reads `file` as a JSON value. Missing or blank files read as `None`.
pub(crate) fn read_json(file: &AtomicFile) -> Result<Option<serde_json::Value>> {
    match file.read()? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}
