//! Runtime configuration
//!
//! Read from a TOML file. A missing file is not an error: every field has a
//! default, so an empty or partial file works too.

use crate::game::Rules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "TERMINAL_HACKER_CONFIG";

const APP_DIR: &str = "terminal-hacker";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Which scan backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Fixed, instant results
    Mock,
    /// Randomized local simulation
    #[default]
    Simulated,
    /// Remote tool server over HTTP
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: String,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Simulated,
            url: "http://127.0.0.1:8000".to_string(),
            min_delay_ms: 500,
            max_delay_ms: 2000,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub prompt: String,
    pub max_transcript_entries: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "root@k4l1:~#".to_string(),
            max_transcript_entries: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: Rules,
    pub backend: BackendConfig,
    pub terminal: TerminalConfig,
    pub logging: LoggingConfig,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid config value for `{field}`: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

impl Config {
    /// Resolve the config file path.
    /// Priority: `TERMINAL_HACKER_CONFIG` env > `<config dir>/terminal-hacker/config.toml`
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    /// Load and validate the config at `path`, defaults if it doesn't exist
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist; using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to load config at: {}", path.display()))?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.game.experience_unit == 0 {
            return Err(ConfigError::new("game.experience_unit", "must be greater than zero"));
        }
        if !(self.game.upgrade_cost_multiplier >= 1.0) {
            return Err(ConfigError::new(
                "game.upgrade_cost_multiplier",
                format!("must be at least 1.0, got {}", self.game.upgrade_cost_multiplier),
            ));
        }
        if self.backend.min_delay_ms > self.backend.max_delay_ms {
            return Err(ConfigError::new(
                "backend.min_delay_ms",
                format!(
                    "{} is larger than backend.max_delay_ms ({})",
                    self.backend.min_delay_ms, self.backend.max_delay_ms
                ),
            ));
        }
        if self.backend.kind == BackendKind::Http && !self.backend.url.starts_with("http") {
            return Err(ConfigError::new("backend.url", "must be an http(s) URL"));
        }
        if self.terminal.max_transcript_entries == 0 {
            return Err(ConfigError::new("terminal.max_transcript_entries", "must be greater than zero"));
        }
        Ok(())
    }

    /// Where log files go
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.logging.dir {
            return dir.clone();
        }
        match dirs::data_local_dir() {
            Some(dir) => dir.join(APP_DIR).join("logs"),
            None => PathBuf::from("logs"),
        }
    }
}
