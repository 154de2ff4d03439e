//! Service configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! is a valid configuration.

use std::path::{Path, PathBuf};

use hashdata_store::{FsResolver, SqliteLedger, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::handler::Handler;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a hashdata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Root of the content tree: objects live at `<data_root>/<type>/<version>.json`.
    pub data_root: PathBuf,
    /// SQLite database holding the ledger.
    pub database: PathBuf,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("/var/lib/hashdata/data"),
            database: PathBuf::from("hashdata.db"),
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build the production handler: filesystem content, SQLite ledger.
    pub fn open_handler(&self) -> Result<Handler<FsResolver, SqliteLedger>, StoreError> {
        let ledger = SqliteLedger::open(&self.database)?;
        Ok(Handler::new(FsResolver::new(&self.data_root), ledger))
    }
}
