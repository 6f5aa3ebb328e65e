//! Configuration types.
//!
//! Configuration is read from `facet.toml` in the platform config
//! directory. A missing file yields defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Search request tuning.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Search request tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Optional per-request deadline in seconds.
    ///
    /// Absent means no deadline: a request either completes, fails, or is
    /// superseded by a newer query.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl SearchConfig {
    /// The configured deadline as a `Duration`.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl EngineConfig {
    /// Load from `facet.toml` in the config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(dir.join("facet.toml"))
    }

    /// Load from an explicit path. A missing file yields defaults;
    /// unreadable or unparsable content is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("facet"))
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
