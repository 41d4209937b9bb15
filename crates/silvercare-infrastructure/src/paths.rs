//! Platform paths for SilverCare configuration and data.
//!
//! Resolved through `AppPaths` from version-migrate so every platform gets
//! its conventional location.
//!
//! ```text
//! ~/.config/silvercare/                   # config dir
//! └── config.toml
//!
//! ~/.local/share/silvercare/              # data dir
//! ├── silvercare-chat-store.json
//! ├── silvercare-health-store.json
//! └── silvercare-notification-store.json
//! ```

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

/// File holding the persisted conversation.
pub const CHAT_STORE_FILE: &str = "silvercare-chat-store.json";
/// File holding the persisted telemetry history.
pub const HEALTH_STORE_FILE: &str = "silvercare-health-store.json";
/// File holding the persisted alert feed.
pub const NOTIFICATION_STORE_FILE: &str = "silvercare-notification-store.json";

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

pub struct SilverCarePaths;

impl SilverCarePaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("silvercare")
    }

    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Data directory, honouring an explicit override.
    pub fn data_dir_or(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
        match override_dir {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Self::data_dir(),
        }
    }
}
