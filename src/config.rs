//! Configuration management
//!
//! Handles loading and parsing of the JSON configuration file with
//! environment variable support for store credentials.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::store::{HttpStore, SqliteStore, TradeStore};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Store credentials can be supplied (or overridden) through the
    /// `TRADE_JOURNAL_API_KEY` / `TRADE_JOURNAL_API_SECRET` environment
    /// variables so they stay out of the config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        if let Ok(api_key) = std::env::var("TRADE_JOURNAL_API_KEY") {
            config.store.api_key = Some(api_key);
        }
        if let Ok(api_secret) = std::env::var("TRADE_JOURNAL_API_SECRET") {
            config.store.api_secret = Some(api_secret);
        }

        Ok(config)
    }

    /// Load from a file when one exists, defaults otherwise.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }
}

/// Which backend holds the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Http,
    Sqlite,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the remote document store (http backend).
    pub base_url: String,
    /// Collection holding the trade documents.
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    /// Database file (sqlite backend).
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::Sqlite,
            base_url: "https://store.example.com".to_string(),
            collection: "trades".to_string(),
            api_key: None,
            api_secret: None,
            db_path: "journal.db".to_string(),
        }
    }
}

impl StoreConfig {
    /// Construct the configured backend.
    pub fn build(&self) -> Result<Box<dyn TradeStore>> {
        match self.backend {
            StoreBackend::Http => {
                let api_key = self
                    .api_key
                    .clone()
                    .context("http backend requires an API key (TRADE_JOURNAL_API_KEY)")?;
                let api_secret = self
                    .api_secret
                    .clone()
                    .context("http backend requires an API secret (TRADE_JOURNAL_API_SECRET)")?;
                Ok(Box::new(HttpStore::new(
                    self.base_url.clone(),
                    self.collection.clone(),
                    api_key,
                    api_secret,
                )))
            }
            StoreBackend::Sqlite => Ok(Box::new(
                SqliteStore::open(&self.db_path).context("Failed to open journal database")?,
            )),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity records are stamped with and filtered by. Absent means
    /// the unscoped shared collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}
