//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or checking settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown network '{0}'")]
    UnknownNetwork(String),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
