//! Loads `AppConfig` from `config.toml`.
//!
//! A missing file yields defaults; a malformed one is an error so a typo
//! never silently drops the user's settings.

use std::path::{Path, PathBuf};

use silvercare_core::config::AppConfig;
use silvercare_core::error::{CareError, Result};

use crate::paths::SilverCarePaths;
use crate::storage::AtomicFile;

/// Environment variables checked for the provider key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"];

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    /// Uses the platform config path (`~/.config/silvercare/config.toml`).
    pub fn default_location() -> Result<Self> {
        let path = SilverCarePaths::config_file().map_err(|e| CareError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the file and applies environment overrides.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    /// Reads the file only.
    pub fn load_file(&self) -> Result<AppConfig> {
        let Some(content) = self.file.read()? else {
            tracing::debug!(
                "No config at {}, using defaults",
                self.file.path().display()
            );
            return Ok(AppConfig::default());
        };

        toml::from_str(&content).map_err(|e| {
            CareError::config(format!(
                "Failed to parse {}: {}",
                self.file.path().display(),
                e
            ))
        })
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        self.file.write(&content)?;
        tracing::info!("Wrote config to {}", self.file.path().display());
        Ok(())
    }
}

/// Fills `proxy.api_key` from the first non-empty variable in [`API_KEY_ENV_VARS`].
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let from_env = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty());

    if let Some(key) = from_env {
        config.proxy.api_key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        assert_eq!(service.load_file().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        std::fs::write(service.path(), "[chat\nendpoint = ").unwrap();

        assert!(matches!(service.load_file(), Err(CareError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        let mut config = AppConfig::default();
        config.chat.endpoint = "http://care.local:8080".to_string();
        config.telemetry.autostart = false;

        service.save(&config).unwrap();

        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_env_key_precedence() {
        let mut config = AppConfig::default();
        config.proxy.api_key = Some("from-file".to_string());

        apply_env_overrides(&mut config, |name| match name {
            "CLAUDE_API_KEY" => Some("  ".to_string()),
            "ANTHROPIC_API_KEY" => Some("from-anthropic".to_string()),
            _ => None,
        });
        assert_eq!(config.proxy.api_key.as_deref(), Some("from-anthropic"));

        apply_env_overrides(&mut config, |name| {
            (name == "CLAUDE_API_KEY").then(|| "from-claude".to_string())
        });
        assert_eq!(config.proxy.api_key.as_deref(), Some("from-claude"));
    }

    #[test]
    fn test_no_env_keeps_file_key() {
        let mut config = AppConfig::default();
        config.proxy.api_key = Some("from-file".to_string());

        apply_env_overrides(&mut config, |_| None);

        assert_eq!(config.proxy.api_key.as_deref(), Some("from-file"));
    }
}
