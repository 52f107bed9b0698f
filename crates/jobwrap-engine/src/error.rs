//! Error types for job execution

use jobwrap_args::TokenizeError;
use jobwrap_runner::RunnerError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a job failed.
///
/// The `Display` text is what the queue sees as the failure message; for a
/// child that exits non-zero it is the status text verbatim (`exit status 2`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("invalid job arguments: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("{status}")]
    ChildExit { status: String },

    #[error("timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("process supervision failed: {reason}")]
    Process { reason: String },

    #[error("internal error: {reason}")]
    Internal { reason: String },
}

/// Coarse failure category, stable for reports and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobErrorKind {
    Tokenize,
    Spawn,
    ChildExit,
    Timeout,
    Process,
    Internal,
}

impl JobErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Spawn => "spawn",
            Self::ChildExit => "child_exit",
            Self::Timeout => "timeout",
            Self::Process => "process",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for JobErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobError {
    #[must_use]
    pub const fn kind(&self) -> JobErrorKind {
        match self {
            Self::Tokenize(_) => JobErrorKind::Tokenize,
            Self::Spawn { .. } => JobErrorKind::Spawn,
            Self::ChildExit { .. } => JobErrorKind::ChildExit,
            Self::Timeout { .. } => JobErrorKind::Timeout,
            Self::Process { .. } => JobErrorKind::Process,
            Self::Internal { .. } => JobErrorKind::Internal,
        }
    }
}

impl From<RunnerError> for JobError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::SpawnFailed { program, reason } => Self::Spawn { program, reason },
            RunnerError::Timeout { timeout_seconds } => Self::Timeout { timeout_seconds },
            RunnerError::WaitFailed { .. } | RunnerError::PipeRead { .. } => Self::Process {
                reason: err.to_string(),
            },
            RunnerError::PipeUnavailable { .. } | RunnerError::RuntimeUnavailable { .. } => {
                Self::Internal {
                    reason: err.to_string(),
                }
            }
        }
    }
}
