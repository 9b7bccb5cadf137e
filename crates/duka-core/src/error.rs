//! Error types for the directory controller

use std::path::PathBuf;
use thiserror::Error;

/// Errors from id-based controller operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// The id is not among the items currently listed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl ControllerError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
