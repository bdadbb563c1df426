//! Centralized application directory paths for agenda.
//!
//! Provides a single source of truth for all filesystem paths used by the
//! crate. Uses the [`dirs`] crate for platform-appropriate directory
//! resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/agenda/` | `~/.local/share/agenda/` |
//! | Config | `~/Library/Application Support/agenda/` | `~/.config/agenda/` |
//!
//! # Environment Overrides
//!
//! All paths can be overridden for testing or custom deployments:
//! - `AGENDA_DATA_DIR` — overrides [`data_dir`]
//! - `AGENDA_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Used for persistent user data: the schedule snapshot and logs.
///
/// Resolves to `dirs::data_dir()/agenda/` by default. Override with
/// the `AGENDA_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AGENDA_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("agenda"))
        .unwrap_or_else(|| PathBuf::from("/tmp/agenda-data"))
}

/// Application config directory.
///
/// Used for `config.toml`.
///
/// Resolves to `dirs::config_dir()/agenda/` by default. Override with
/// the `AGENDA_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AGENDA_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("agenda"))
        .unwrap_or_else(|| PathBuf::from("/tmp/agenda-config"))
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Schedule snapshot file path (`data_dir()/schedules.json`).
#[must_use]
pub fn schedules_file() -> PathBuf {
    data_dir().join("schedules.json")
}
