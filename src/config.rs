//! Store configuration
//!
//! ```yaml
//! backend: rocksdb
//! path: ./data/infostore
//! base: http://example.org/docs/
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Backend {0} requires a path")]
    MissingPath(BackendKind),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which quad backend a store runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Indexed in-memory quads, lost on drop
    Memory,
    /// RocksDB database directory
    #[serde(alias = "rocks")]
    RocksDb,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => f.write_str("memory"),
            BackendKind::RocksDb => f.write_str("rocksdb"),
        }
    }
}

/// Information store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to construct; there is no implicit default
    pub backend: BackendKind,
    /// Storage directory, required by persistent backends
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Base IRI for resolving relative load locations
    #[serde(default)]
    pub base: Option<String>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            path: None,
            base: None,
        }
    }

    pub fn rocksdb(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::RocksDb,
            path: Some(path.into()),
            base: None,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == BackendKind::RocksDb && self.path.is_none() {
            return Err(ConfigError::MissingPath(self.backend));
        }
        Ok(())
    }
}
