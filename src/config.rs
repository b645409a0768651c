//! Tool settings stored in `~/.bordermark/config.toml`.
//!
//! Every key is optional:
//!
//! ```toml
//! # tracing filter used when RUST_LOG is unset and --verbose is off
//! log_level = "warn"
//!
//! # reload the written image and check the message survived
//! verify_after_embed = true
//!
//! # let `embed --output` write JPEG and other lossy formats
//! allow_lossy_output = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tracing filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors that can occur when loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Tool settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tracing filter directive, e.g. `"info"` or `"bordermark=debug"`.
    pub log_level: String,

    /// Reload the saved image after `embed` and check the message.
    pub verify_after_embed: bool,

    /// Let `embed` write lossy formats. Off by default, since recompression
    /// destroys the watermark.
    pub allow_lossy_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            verify_after_embed: true,
            allow_lossy_output: false,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parses settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Path of the default settings file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

/// Returns `~/.bordermark`.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".bordermark"))
        .ok_or(ConfigError::NoConfigDir)
}
