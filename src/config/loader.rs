//! Configuration loader
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::ConfigDefaults;
use super::validator::ConfigValidator;
use crate::process::{DuplicatePolicy, NameMatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Process lookup and access settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_name_match")]
    pub name_match: NameMatch,
    #[serde(default = "default_on_duplicate")]
    pub on_duplicate: DuplicatePolicy,
    #[serde(default = "default_enable_debug_privilege")]
    pub enable_debug_privilege: bool,
}

/// Memory read settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this loader reads from
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is absent
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads and validates configuration
///
/// An explicit `path` must exist. Without one, `procpeek.toml` in the working
/// directory is read if present and defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => ConfigLoader::new(path).load()?,
        None => ConfigLoader::new(ConfigDefaults::CONFIG_FILE).load_or_default()?,
    };
    ConfigValidator::validate(&config)?;
    Ok(config)
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            name_match: default_name_match(),
            on_duplicate: default_on_duplicate(),
            enable_debug_privilege: default_enable_debug_privilege(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            max_read_size: default_max_read_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

// Individual field defaults for serde
fn default_name_match() -> NameMatch {
    ConfigDefaults::NAME_MATCH
}

fn default_on_duplicate() -> DuplicatePolicy {
    ConfigDefaults::ON_DUPLICATE
}

fn default_enable_debug_privilege() -> bool {
    ConfigDefaults::ENABLE_DEBUG_PRIVILEGE
}

fn default_max_read_size() -> usize {
    ConfigDefaults::MAX_READ_SIZE
}

fn default_log_level() -> String {
    ConfigDefaults::LOG_LEVEL.to_string()
}
