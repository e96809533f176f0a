use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Storage key the mobile app has always written stock under.
pub const DEFAULT_STORAGE_KEY: &str = "@MyApp:stock-native-app";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StockConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_mailbox_capacity() -> usize {
    32
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            mailbox_capacity: default_mailbox_capacity(),
            data_dir: default_data_dir(),
        }
    }
}

impl StockConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: StockConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid("mailbox_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
