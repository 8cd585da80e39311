//! Layered configuration loading

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ConciergeConfig;

/// Values supplied on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Backend base URL
    pub base_url: Option<String>,
    /// State directory
    pub state_dir: Option<PathBuf>,
    /// Log level
    pub log_level: Option<String>,
}

impl ConciergeConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(config_file: Option<PathBuf>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(url) = std::env::var("CONCIERGE_BASE_URL") {
            config.backend.base_url = url;
        }
        if let Ok(timeout) = std::env::var("CONCIERGE_TIMEOUT") {
            let secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid CONCIERGE_TIMEOUT: {timeout}"))?;
            config.backend.timeout_secs = Some(secs);
        }
        if let Ok(dir) = std::env::var("CONCIERGE_STATE_DIR") {
            config.storage.state_dir = Some(PathBuf::from(dir));
        }
        if let Ok(level) = std::env::var("CONCIERGE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(url) = overrides.base_url {
            config.backend.base_url = url;
        }
        if let Some(dir) = overrides.state_dir {
            config.storage.state_dir = Some(dir);
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("concierge");
        Ok(config_dir.join("config.toml"))
    }

    /// Create a new config file with example values
    pub fn create_example(path: &Path) -> Result<()> {
        let example = r#"# Concierge Client Configuration
# Location: ~/.config/concierge/config.toml

[backend]
# Base URL of the concierge backend
# Default: http://localhost:8000
base_url = "http://localhost:8000"

# Request timeout in seconds
# Default: unset (requests wait indefinitely)
# timeout_secs = 30

[ui]
# Show the beta notice on first launch
show_splash = true

# How long the feedback confirmation stays up (milliseconds)
feedback_close_delay_ms = 2000

[storage]
# Where persisted client state (state.json) is kept
# Default: platform data directory, e.g. ~/.local/share/concierge
# state_dir = "/home/user/.local/share/concierge"

[logging]
# off, error, warn, info, debug, trace
level = "warn"
"#;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, example).context("Failed to write config file")?;

        Ok(())
    }

    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        // Test mode never reads the user's real config
        if std::env::var("CONCIERGE_TEST_MODE").is_ok() && config_file.is_none() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}
