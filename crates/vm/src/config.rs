//! Configuration system for the virtual machine.
//!
//! This module defines the knobs a run can be tuned with. It provides:
//! 1. **Defaults:** Baseline values for the step budget, hash table and views.
//! 2. **Structures:** Hierarchical config for history, debugger and general settings.
//! 3. **Loading:** JSON parsing from a string or a file, plus validation.
//!
//! Every field is optional in JSON; missing sections and fields take their defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{ConfigError, constants};

/// Default configuration values.
mod defaults {
    use crate::common::constants;

    /// Snapshot count at which a run is stopped.
    pub const MAX_STEPS: usize = constants::MAX_HISTORY_LEN;

    /// Loop table size and hash modulus.
    pub const HASH_MODULUS: u32 = constants::HASH_MODULUS;

    /// History length above which the full view needs confirmation.
    pub const FULL_VIEW_THRESHOLD: usize = constants::FULL_VIEW_CONFIRM_THRESHOLD;

    /// Rows shown by the windowed view.
    pub const WINDOW_ROWS: usize = constants::WINDOW_ROWS;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use stepvm_core::config::Config;
///
/// let config = Config::from_json(r#"{ "history": { "max_steps": 500 } }"#).unwrap();
/// assert_eq!(config.history.max_steps, 500);
/// assert_eq!(config.history.hash_modulus, 10007);
/// assert_eq!(config.debugger.window_rows, 10);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Step budget and loop detection
    #[serde(default)]
    pub history: HistoryConfig,
    /// Stepping controller and views
    #[serde(default)]
    pub debugger: DebuggerConfig,
    /// Miscellaneous settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or
    /// [`ConfigError::Invalid`] if [`Config::validate`] rejects a value.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that every value is usable.
    ///
    /// Sessions call this before building any state, so a hand-built config
    /// is held to the same limits as one parsed from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.hash_modulus == 0 {
            return Err(ConfigError::Invalid(
                "history.hash_modulus must be positive".into(),
            ));
        }
        if self.history.hash_modulus > constants::MAX_HASH_MODULUS {
            return Err(ConfigError::Invalid(format!(
                "history.hash_modulus must be at most {}",
                constants::MAX_HASH_MODULUS
            )));
        }
        if self.history.max_steps < 2 {
            return Err(ConfigError::Invalid(
                "history.max_steps must be at least 2".into(),
            ));
        }
        if self.history.max_steps > constants::MAX_STEPS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "history.max_steps must be at most {}",
                constants::MAX_STEPS_LIMIT
            )));
        }
        if self.debugger.window_rows == 0 {
            return Err(ConfigError::Invalid(
                "debugger.window_rows must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Execution history settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Snapshot count that stops a run with a budget error
    #[serde(default = "HistoryConfig::default_max_steps")]
    pub max_steps: usize,

    /// Modulus of the snapshot hash (should be prime)
    #[serde(default = "HistoryConfig::default_hash_modulus")]
    pub hash_modulus: u32,
}

impl HistoryConfig {
    fn default_max_steps() -> usize {
        defaults::MAX_STEPS
    }

    fn default_hash_modulus() -> u32 {
        defaults::HASH_MODULUS
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_steps: defaults::MAX_STEPS,
            hash_modulus: defaults::HASH_MODULUS,
        }
    }
}

/// Stepping controller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DebuggerConfig {
    /// History length above which switching to the full view asks first
    #[serde(default = "DebuggerConfig::default_full_view_threshold")]
    pub full_view_threshold: usize,

    /// Rows visible in the windowed view
    #[serde(default = "DebuggerConfig::default_window_rows")]
    pub window_rows: usize,
}

impl DebuggerConfig {
    fn default_full_view_threshold() -> usize {
        defaults::FULL_VIEW_THRESHOLD
    }

    fn default_window_rows() -> usize {
        defaults::WINDOW_ROWS
    }
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            full_view_threshold: defaults::FULL_VIEW_THRESHOLD,
            window_rows: defaults::WINDOW_ROWS,
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `trace` event for every executed instruction
    #[serde(default)]
    pub trace_steps: bool,
}
