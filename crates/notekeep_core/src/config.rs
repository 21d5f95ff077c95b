//! Process configuration for binaries embedding the core.
//!
//! Values come from environment variables:
//! - `NOTEKEEP_LOG_LEVEL`: `trace|debug|info|warn|error`, defaults to
//!   [`default_log_level`].
//! - `NOTEKEEP_LOG_DIR`: absolute directory for log files; logging stays off
//!   when unset.
//! - `NOTEKEEP_STORAGE`: `memory` (default) or `sqlite`.
//! - `NOTEKEEP_DB_PATH`: database file, required for `sqlite`.

use crate::logging::{default_log_level, LogLevel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "NOTEKEEP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEKEEP_LOG_DIR";
pub const ENV_STORAGE: &str = "NOTEKEEP_STORAGE";
pub const ENV_DB_PATH: &str = "NOTEKEEP_DB_PATH";

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    UnknownStorage(String),
    MissingDbPath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => {
                write!(f, "{ENV_LOG_LEVEL}: unsupported log level `{value}`")
            }
            Self::UnknownStorage(value) => {
                write!(f, "{ENV_STORAGE}: expected memory|sqlite, got `{value}`")
            }
            Self::MissingDbPath => write!(f, "{ENV_DB_PATH} is required for sqlite storage"),
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let raw_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_level = raw_level
            .parse::<LogLevel>()
            .map_err(|_| ConfigError::InvalidLogLevel(raw_level.clone()))?;

        let storage = match read(ENV_STORAGE) {
            None => StorageConfig::InMemory,
            Some(kind) if kind.eq_ignore_ascii_case("memory") => StorageConfig::InMemory,
            Some(kind) if kind.eq_ignore_ascii_case("sqlite") => StorageConfig::Sqlite {
                path: read(ENV_DB_PATH)
                    .map(PathBuf::from)
                    .ok_or(ConfigError::MissingDbPath)?,
            },
            Some(other) => return Err(ConfigError::UnknownStorage(other)),
        };

        Ok(Self {
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            storage,
        })
    }
}
