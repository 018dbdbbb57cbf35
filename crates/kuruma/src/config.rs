//! Resource set configuration (kuruma.toml)
//!
//! Lists the resources that make up one server's resource set and the
//! resolver options to apply to them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by the CLI when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "kuruma.toml";

/// The only configuration format version understood
pub const CONFIG_VERSION: u32 = 1;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Contents of a kuruma.toml file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Resolver options
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Resources in the set, in node order
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Infer requirements from `@resource/...` script paths
    #[serde(default)]
    pub infer_script_dependencies: bool,
}

/// One `[[resources]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Resource directory, relative to the config file
    pub path: String,

    /// Explicit identity; the directory name otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            resolver: ResolverConfig::default(),
            resources: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise use the default config
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::ValidationError(format!(
                "Unsupported config version {}, expected {}",
                self.version, CONFIG_VERSION
            )));
        }

        for (index, entry) in self.resources.iter().enumerate() {
            if entry.path.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Resource entry {} has an empty path",
                    index
                )));
            }
            if matches!(&entry.name, Some(name) if name.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "Resource entry {} ({}) has an empty name",
                    index, entry.path
                )));
            }
        }

        Ok(())
    }

    /// Enabled entries, in declaration order
    pub fn enabled_resources(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.iter().filter(|entry| entry.enabled)
    }
}

impl ResourceEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            enabled: true,
        }
    }

    /// The entry's directory, resolved against `base`
    pub fn directory(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }
}
