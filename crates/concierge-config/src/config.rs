//! Configuration types and their defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default backend the web frontend is served from
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default delay before the feedback form closes after a successful submit
pub const DEFAULT_FEEDBACK_CLOSE_DELAY_MS: u64 = 2000;

/// Validation errors for a loaded configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Backend URL is not an http(s) URL
    #[error("Invalid backend URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    /// Request timeout of zero seconds
    #[error("Invalid request timeout: must be at least 1 second")]
    InvalidTimeout,

    /// Log level is not one of the known tracing levels
    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConciergeConfig {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Interactive session settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Persisted client state
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the concierge backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Show the first-run splash document
    #[serde(default = "default_true")]
    pub show_splash: bool,

    /// Milliseconds to keep the feedback confirmation visible
    #[serde(default = "default_feedback_close_delay_ms")]
    pub feedback_close_delay_ms: u64,
}

/// Persisted client state location
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding `state.json`. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_splash: true,
            feedback_close_delay_ms: DEFAULT_FEEDBACK_CLOSE_DELAY_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_feedback_close_delay_ms() -> u64 {
    DEFAULT_FEEDBACK_CLOSE_DELAY_MS
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

impl ConciergeConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.backend.base_url.clone()));
        }
        if self.backend.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }
        Ok(())
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }

    /// Delay before the feedback form auto-closes
    pub fn feedback_close_delay(&self) -> Duration {
        Duration::from_millis(self.ui.feedback_close_delay_ms)
    }

    /// Resolved state directory (configured or platform default)
    pub fn state_dir(&self) -> Option<PathBuf> {
        self.storage
            .state_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("concierge")))
    }
}
