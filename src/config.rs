use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::compose::Combinator;
use crate::data::service::ServiceKeywords;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "CASE_BROWSER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_path")]
    pub default_path: String,
}

fn default_path() -> String {
    "data/cases_all.parquet".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_path: default_path(),
        }
    }
}

/// Names of the columns the browser builds filters for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default = "default_tags")]
    pub tags: String,
}

fn default_service() -> String {
    "helsetjeneste".into()
}
fn default_field() -> String {
    "fagområde".into()
}
fn default_tags() -> String {
    "tags".into()
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            field: default_field(),
            tags: default_tags(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FiltersConfig {
    #[serde(default)]
    pub default_combinator: Combinator,
    /// Start the per-column "match all" toggles switched on.
    #[serde(default)]
    pub and_mode_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrowserConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub service: ServiceKeywords,
    #[serde(default)]
    pub filters: FiltersConfig,
}

impl BrowserConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("case-browser")
            .join("config.toml")
    }

    /// Load from `$CASE_BROWSER_CONFIG` or the default location. A missing
    /// file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var(CONFIG_ENV) {
            Ok(env_path) => PathBuf::from(env_path),
            Err(_) => Self::config_path(),
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
