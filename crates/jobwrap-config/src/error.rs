use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker name must be provided")]
    MissingName,

    #[error("worker command must be provided")]
    MissingCommand,

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("must provide host and port")]
    MissingEndpoint,

    #[error("failed to read config file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("failed to parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to determine working directory: {reason}")]
    WorkingDirectory { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
