//! Application configuration (TOML).
//!
//! Every key is optional; a missing file or a partial file falls back to the
//! defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Period;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "stockscope.toml";

/// Default report store file name, created in the working directory.
pub const DEFAULT_STORE_FILE: &str = "Stock_Data.csv";

const DEFAULT_TICKER_LIST_URL: &str = "https://docs.google.com/spreadsheets/d/1jjgmwu6vuWMwHXuki0QMVFQzLEJls9Eb-NsuRIdmIw4/export?format=csv&gid=657778748";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Report store path.
    pub store_path: PathBuf,

    /// History window the trend predictor fits over.
    pub prediction_lookback: Period,

    /// Currency symbol prefixed to predicted prices.
    pub currency_symbol: String,

    /// Currency label for chart axes, e.g. `Price (INR)`.
    pub currency_label: String,

    pub provider: ProviderConfig,

    pub bulk: BulkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            prediction_lookback: Period::SixMonths,
            currency_symbol: "\u{20b9}".to_string(),
            currency_label: "INR".to_string(),
            provider: ProviderConfig::default(),
            bulk: BulkConfig::default(),
        }
    }
}

/// Market data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout. Unset means requests may block indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: None,
        }
    }
}

/// Bulk (file-driven) fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// CSV document listing tickers, one group per column.
    pub ticker_list_url: String,
    /// Exchange suffix applied to every listed ticker.
    pub exchange: String,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            ticker_list_url: DEFAULT_TICKER_LIST_URL.to_string(),
            exchange: "NS".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `explicit` if given, else `stockscope.toml` in the working
    /// directory if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
