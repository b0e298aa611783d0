use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from an optional TOML file. Every key may be omitted.
///
/// ```toml
/// database = "/var/lib/tally/ledger.db"
/// log = "tally_import=debug,info"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// `<platform data dir>/ledger.db`, or `./ledger.db` when no home directory
/// can be determined.
pub fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "tally", "Tally")
        .map(|dirs| dirs.data_dir().join("ledger.db"))
        .unwrap_or_else(|| PathBuf::from("ledger.db"))
}
