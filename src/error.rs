//! Top-level CLI error and its exit code mapping

use jobwrap_config::ConfigError;
use jobwrap_engine::JobErrorKind;
use jobwrap_utils::exit_codes::ExitCode;
use jobwrap_utils::payload_io::PayloadIoError;
use thiserror::Error;

/// Everything a CLI command can fail with
#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Payload(#[from] PayloadIoError),

    #[error("job failed ({kind}): {message}")]
    JobFailed { kind: JobErrorKind, message: String },

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    /// Map to the process exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(ConfigError::MissingName) => ExitCode::NAME_MISSING,
            Self::Config(ConfigError::MissingCommand) => ExitCode::COMMAND_MISSING,
            Self::Config(ConfigError::WorkingDirectory { .. }) => ExitCode::IO,
            Self::Config(_) => ExitCode::CONFIG_INVALID,
            Self::Payload(_) => ExitCode::IO,
            Self::JobFailed { .. } => ExitCode::JOB_FAILED,
            Self::Internal(_) => ExitCode::INTERNAL,
        }
    }
}
