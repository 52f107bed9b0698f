//! Error types for runner module

use thiserror::Error;

/// Failures while starting, draining, or waiting for a child process.
///
/// A child that runs and exits non-zero is not an error at this level; see
/// [`ProcessOutput::success`](crate::ProcessOutput::success).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to start '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("child {stream} pipe was not captured")]
    PipeUnavailable { stream: &'static str },

    #[error("failed to read child {stream}: {reason}")]
    PipeRead { stream: &'static str, reason: String },

    #[error("failed to wait for child: {reason}")]
    WaitFailed { reason: String },

    #[error("failed to start process supervisor: {reason}")]
    RuntimeUnavailable { reason: String },

    #[error("timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}
