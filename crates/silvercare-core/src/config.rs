//! Application configuration model.
//!
//! Every field has a default so a partial (or missing) `config.toml` is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::profile::UserProfile;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Falls back to the built-in demo resident when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl AppConfig {
    pub fn profile(&self) -> UserProfile {
        self.profile.clone().unwrap_or_else(UserProfile::demo)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the chat proxy; `/api/chat` is appended.
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Run the proxy in-process instead of calling `endpoint`.
    pub direct: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            direct: false,
        }
    }
}

impl ChatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    pub tick_interval_secs: u64,
    pub autostart: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            autostart: true,
        }
    }
}

impl TelemetryConfig {
    /// Never zero; a zero period would spin the ticker.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub info_auto_dismiss_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            info_auto_dismiss_secs: 5,
        }
    }
}

impl NotificationConfig {
    pub fn info_auto_dismiss(&self) -> Duration {
        Duration::from_secs(self.info_auto_dismiss_secs)
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    pub bind: String,
    pub model: String,
    pub max_tokens: u32,
    /// Provider key. `CLAUDE_API_KEY` / `ANTHROPIC_API_KEY` take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1000,
            api_key: None,
        }
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind", &self.bind)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chat.endpoint, "http://localhost:3000");
        assert_eq!(config.telemetry.tick_interval(), Duration::from_secs(30));
        assert_eq!(config.notifications.info_auto_dismiss(), Duration::from_secs(5));
        assert_eq!(config.proxy.max_tokens, 1000);
        assert_eq!(config.profile().name, "김영희");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [chat]
            direct = true

            [telemetry]
            tick_interval_secs = 0

            [profile]
            name = "이순자"
            age = 81
            "#,
        )
        .unwrap();

        assert!(config.chat.direct);
        assert_eq!(config.chat.request_timeout_secs, 30);
        assert_eq!(config.telemetry.tick_interval(), Duration::from_secs(1));
        assert!(config.telemetry.autostart);
        assert_eq!(config.profile().name, "이순자");
    }

    #[test]
    fn test_proxy_debug_redacts_key() {
        let proxy = ProxyConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", proxy);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
