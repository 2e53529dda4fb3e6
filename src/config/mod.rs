//! Persistent configuration.
//!
//! Settings live in a JSON file under the user's config directory:
//!
//! ```text
//! <config_dir>/study-timer/config.json
//! ```
//!
//! A missing file yields the defaults, and missing fields fall back to
//! their serde defaults. Durations are clamped on load so a hand-edited
//! file can never put the timer outside its bounds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{SettingsPatch, TimerSettings};

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "study-timer";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.json";

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory (e.g. `$HOME` unset).
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid config JSON.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// AppConfig
// ============================================================================

fn default_sound_enabled() -> bool {
    true
}

/// Completion sound preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Whether to play a sound when a countdown finishes.
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,

    /// Audio file to play instead of the built-in chime.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            file: None,
        }
    }
}

/// Everything stored in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Timer durations and auto-continue flags.
    #[serde(default)]
    pub timer: TimerSettings,

    /// Sound preferences.
    #[serde(default)]
    pub sound: SoundConfig,
}

impl AppConfig {
    /// Returns a copy with the timer patch merged in (clamped).
    #[must_use]
    pub fn with_timer_patch(mut self, patch: &SettingsPatch) -> Self {
        patch.apply_to(&mut self.timer);
        self
    }
}

// ============================================================================
// ConfigStore
// ============================================================================

/// Loads and saves [`AppConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigDir` if the platform config directory is unknown.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Platform default config path.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigDir` if the platform config directory is unknown.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, falling back to defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `Read` on I/O failure and `Parse` on malformed JSON.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                return Ok(AppConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut config: AppConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if let Err(e) = config.timer.validate() {
            warn!("{} in {}, clamping", e, self.path.display());
            config.timer = config.timer.clamped();
        }
        Ok(config)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the directory or file cannot be written.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, json + "\n").map_err(write_err)?;

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
