//! Configuration for a clipvault data directory.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Comprehensive configuration for a clipvault data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Clipboard monitor configuration.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// History store configuration.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from the data directory, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| VaultError::Config(format!("failed to read config: {}", e)))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| VaultError::Config(format!("failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the data directory.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| VaultError::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Rejects values the stores and monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(VaultError::Config(
                "monitor.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Clipboard monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between clipboard polls in milliseconds (default: 500).
    /// Shorter catches copies sooner, longer touches the clipboard less.
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl MonitorConfig {
    /// Returns the poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// History store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept; the oldest unpinned entries are
    /// evicted past this. 0 means unlimited (default).
    pub max_entries: usize,
}

impl HistoryConfig {
    /// Returns the capacity, or `None` when unlimited.
    pub fn capacity(&self) -> Option<usize> {
        (self.max_entries > 0).then_some(self.max_entries)
    }
}
