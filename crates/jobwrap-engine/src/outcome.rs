use jobwrap_runner::ProcessRunner;

use crate::error::JobErrorKind;
use crate::executor::JobExecutor;
use crate::job::Job;

/// What the queue is told about a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success(Vec<u8>),
    Failure { kind: JobErrorKind, message: String },
}

impl JobOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Process `job` and report the result to it.
///
/// On success the data is passed to [`Job::emit_result`] before returning.
/// Failures carry the error's display text unchanged.
pub fn complete<R: ProcessRunner>(executor: &JobExecutor<R>, job: &mut dyn Job) -> JobOutcome {
    match executor.process(job) {
        Ok(data) => {
            job.emit_result(&data);
            JobOutcome::Success(data)
        }
        Err(err) => JobOutcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
        },
    }
}
