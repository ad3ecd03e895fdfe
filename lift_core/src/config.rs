//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub rest: RestConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Session preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Alternate between superset members instead of finishing each exercise first
    #[serde(default = "default_superset_mode")]
    pub superset_mode: bool,

    /// Identity recorded on finished workout logs
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            superset_mode: default_superset_mode(),
            user_id: default_user_id(),
        }
    }
}

/// Rest duration configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestConfig {
    /// Use a set's own `rest_seconds` when the program provides one
    #[serde(default = "default_prefer_explicit")]
    pub prefer_explicit: bool,

    /// Rest for heavy targets ("RM", low rep counts)
    #[serde(default = "default_heavy_seconds")]
    pub heavy_seconds: u32,

    /// Rest for moderate targets (8-10 reps)
    #[serde(default = "default_moderate_seconds")]
    pub moderate_seconds: u32,

    /// Rest for everything else
    #[serde(default = "default_light_seconds")]
    pub light_seconds: u32,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            prefer_explicit: default_prefer_explicit(),
            heavy_seconds: default_heavy_seconds(),
            moderate_seconds: default_moderate_seconds(),
            light_seconds: default_light_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_superset_mode() -> bool {
    true
}

fn default_user_id() -> String {
    "local".into()
}

fn default_prefer_explicit() -> bool {
    true
}

fn default_heavy_seconds() -> u32 {
    180
}

fn default_moderate_seconds() -> u32 {
    90
}

fn default_light_seconds() -> u32 {
    60
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let rest = &self.rest;
        if rest.light_seconds == 0 {
            return Err(Error::Config("rest.light_seconds must be positive".into()));
        }
        if rest.heavy_seconds < rest.moderate_seconds || rest.moderate_seconds < rest.light_seconds
        {
            return Err(Error::Config(format!(
                "rest buckets must not increase: heavy {} / moderate {} / light {}",
                rest.heavy_seconds, rest.moderate_seconds, rest.light_seconds
            )));
        }
        if self.session.user_id.trim().is_empty() {
            return Err(Error::Config("session.user_id must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
