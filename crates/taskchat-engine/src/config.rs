//! Client configuration.
//!
//! Settings live in an optional `config.json` inside the state directory.
//! Missing fields fall back to the defaults below; command-line flags
//! override whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the state directory under the platform data dir.
const APP_DIR: &str = "taskchat";

/// File name of the configuration inside the state directory.
pub const CONFIG_FILE: &str = "config.json";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat backend (no trailing slash needed).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Conversation identifier sent with every request.
    #[serde(default = "default_conversation_id")]
    pub conversation_id: u64,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// TUI tick rate in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_conversation_id() -> u64 {
    1
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            conversation_id: default_conversation_id(),
            request_timeout_secs: None,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load `config.json` from the state directory, or defaults if absent.
    pub fn load_or_default(state_dir: &Path) -> Result<Self, ConfigError> {
        let path = state_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout as a duration, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Default state directory (`<data-local-dir>/taskchat`).
pub fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoStateDir)
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("could not determine a state directory; pass --state-dir")]
    NoStateDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.conversation_id, 1);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://10.0.0.2:9000/"}"#).unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.2:9000");
        assert_eq!(config.conversation_id, 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILE);

        let config = ClientConfig {
            request_timeout_secs: Some(30),
            ..ClientConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let config = ClientConfig::load_or_default(temp.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE), "nope").unwrap();
        let err = ClientConfig::load_or_default(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
