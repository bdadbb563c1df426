//! Configuration types for the agenda daemon.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaConfig {
    /// Reminder scanner settings.
    pub scanner: ScannerConfig,
    /// Snapshot storage settings.
    pub storage: StorageConfig,
    /// Notice presentation settings.
    pub notice: NoticeConfig,
}

/// Reminder scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Seconds between scan ticks.
    pub scan_interval_secs: u64,
    /// Symmetric tolerance band around the reminder threshold, in seconds.
    ///
    /// Should be at least the scan interval, otherwise thresholds can fall
    /// between two ticks and never fire.
    pub tolerance_secs: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 60,
            tolerance_secs: 60,
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file path (None = `app_dirs::schedules_file()`).
    pub snapshot_path: Option<PathBuf>,
}

impl StorageConfig {
    /// The effective snapshot path.
    #[must_use]
    pub fn effective_snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(crate::app_dirs::schedules_file)
    }
}

/// Notice presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Suggested display duration for reminder notices, in milliseconds.
    pub default_duration_ms: u32,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: crate::notice::DEFAULT_NOTICE_DURATION_MS,
        }
    }
}

impl AgendaConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::AgendaError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AgendaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }
}
