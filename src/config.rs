//! Configuration loading and management
//!
//! Handles parsing of the `dz.toml` configuration file in the data
//! directory.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Persistence strategy: "local" or "remote"
    #[serde(default)]
    pub backend: Backend,

    /// Remote backend configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Activity log configuration
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            remote: RemoteConfig::default(),
            activity: ActivityConfig::default(),
        }
    }
}

/// Which persistence strategy backs the board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "remote" => Ok(Backend::Remote),
            _ => Err(Error::InvalidArgument(format!(
                "unknown backend '{raw}' (expected local|remote)"
            ))),
        }
    }
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Base URL of the task service
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://donezo-server.vercel.app".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Activity log configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityConfig {
    /// How many entries `dz log` shows by default
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,

    /// Optional cap on retained entries; absent means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain: Option<usize>,
}

fn default_display_limit() -> usize {
    10
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
            retain: None,
        }
    }
}

impl Config {
    /// Load configuration from a `dz.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    /// when the file is absent or unreadable.
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join("dz.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "remote.base_url cannot be empty".to_string(),
            ));
        }
        if self.activity.retain == Some(0) {
            return Err(Error::InvalidConfig(
                "activity.retain must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
