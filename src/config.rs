//! Application configuration, loaded from a TOML file.
//!
//! Every field has a default so a partial (or absent) file still yields a
//! usable configuration; unknown keys are rejected to catch typos early.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{ConfigurationError, Error};
use crate::models::timeframe::Timeframe;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub universe: UniverseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            universe: UniverseConfig::default(),
        }
    }
}

/// Where bars come from and where they are stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub provider: String,
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            provider: "local_parquet".to_string(),
            path: PathBuf::from("./data"),
        }
    }
}

/// Symbols and timeframe to operate on when none are given on the command
/// line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniverseConfig {
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string()],
            timeframe: Timeframe::OneDay,
        }
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, Error> {
    let raw = fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|err| {
        ConfigurationError::InvalidConfig {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
        .into()
    })
}
