//! Configuration file support for fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,
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

impl DataConfig {
    /// Path of the key-value store file inside the data directory
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

/// Output presentation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How many recent weight entries the progress view lists
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_points: default_chart_points(),
        }
    }
}

/// File name of the store inside the data directory
pub const STORE_FILE_NAME: &str = "store.json";

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir_or_cwd().join(".local/share"));
    base.join("fitlog")
}

fn default_chart_points() -> usize {
    crate::weight::DEFAULT_CHART_POINTS
}

fn home_dir_or_cwd() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir_or_cwd().join(".config"));
        base.join("fitlog").join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.display.chart_points == 0 {
            return Err(Error::Config(
                "display.chart_points must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
