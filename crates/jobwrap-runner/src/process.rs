use crate::error::RunnerError;
use jobwrap_utils::LineRing;
use std::process::ExitStatus;
use std::time::Duration;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - process execution seam
// ============================================================================

/// Output from a process execution.
///
/// Stderr is not part of the output: it is streamed into the caller's
/// [`LineRing`] and passed through while the child runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Terminating signal, if any
    pub signal: Option<i32>,
    /// Number of stderr lines the child wrote
    pub stderr_lines: usize,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(
        stdout: Vec<u8>,
        exit_code: Option<i32>,
        signal: Option<i32>,
        stderr_lines: usize,
    ) -> Self {
        Self {
            stdout,
            exit_code,
            signal,
            stderr_lines,
        }
    }

    /// Build from an OS exit status.
    #[must_use]
    pub fn from_status(stdout: Vec<u8>, status: ExitStatus, stderr_lines: usize) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self::new(stdout, status.code(), signal, stderr_lines)
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Status text used as the failure message, e.g. `exit status 2`.
    #[must_use]
    pub fn status_text(&self) -> String {
        match (self.exit_code, self.signal) {
            (Some(code), _) => format!("exit status {code}"),
            (None, Some(signal)) => format!("signal {signal}"),
            (None, None) => "unknown exit status".to_string(),
        }
    }
}

/// Where the child's stderr is copied while it is being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StderrPassthrough {
    /// Copy to this process's stderr
    #[default]
    Inherit,
    /// Capture only
    Discard,
}

/// Per-run options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Kill the child after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub passthrough: StderrPassthrough,
}

impl RunOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_passthrough(mut self, passthrough: StderrPassthrough) -> Self {
        self.passthrough = passthrough;
        self
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation)
/// and MUST drain stdout and stderr concurrently so a child blocked on one
/// full pipe cannot deadlock the run.
///
/// # Threading
///
/// `ProcessRunner` is a synchronous interface. Implementations MAY internally
/// drive an async runtime but MUST NOT expose async in the public API.
///
/// # Example
///
/// ```rust
/// use jobwrap_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunOptions, RunnerError};
/// use jobwrap_utils::LineRing;
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(
///         &self,
///         _cmd: &CommandSpec,
///         _options: &RunOptions,
///         stderr_lines: &mut LineRing,
///     ) -> Result<ProcessOutput, RunnerError> {
///         stderr_lines.push("warming up");
///         Ok(ProcessOutput::new(b"done\n".to_vec(), Some(0), None, 1))
///     }
/// }
///
/// let mut lines = LineRing::new(5);
/// let output = CannedRunner
///     .run(&CommandSpec::new("anything"), &RunOptions::default(), &mut lines)
///     .unwrap();
/// assert!(output.success());
/// assert_eq!(lines.len(), 1);
/// ```
pub trait ProcessRunner {
    /// Execute a command to completion.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutput)` - The process completed (possibly with non-zero exit code)
    /// * `Err(RunnerError::Timeout)` - The process was killed after the timeout
    /// * `Err(RunnerError::*)` - The process could not be started or supervised
    fn run(
        &self,
        cmd: &CommandSpec,
        options: &RunOptions,
        stderr_lines: &mut LineRing,
    ) -> Result<ProcessOutput, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::new(Vec::new(), Some(0), None, 0).success());
        assert!(!ProcessOutput::new(Vec::new(), Some(1), None, 0).success());
        assert!(!ProcessOutput::new(Vec::new(), None, Some(9), 0).success());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(
            ProcessOutput::new(Vec::new(), Some(2), None, 0).status_text(),
            "exit status 2"
        );
        assert_eq!(
            ProcessOutput::new(Vec::new(), None, Some(9), 0).status_text(),
            "signal 9"
        );
        assert_eq!(
            ProcessOutput::new(Vec::new(), None, None, 0).status_text(),
            "unknown exit status"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_from_status_unix() {
        use std::os::unix::process::ExitStatusExt;

        let exited = ProcessOutput::from_status(Vec::new(), ExitStatus::from_raw(2 << 8), 0);
        assert_eq!(exited.exit_code, Some(2));
        assert_eq!(exited.signal, None);

        let killed = ProcessOutput::from_status(Vec::new(), ExitStatus::from_raw(9), 0);
        assert_eq!(killed.exit_code, None);
        assert_eq!(killed.signal, Some(9));
        assert_eq!(killed.status_text(), "signal 9");
    }

    #[test]
    fn test_run_options_builders() {
        let options = RunOptions::default()
            .with_timeout(Some(Duration::from_secs(3)))
            .with_passthrough(StderrPassthrough::Discard);
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.passthrough, StderrPassthrough::Discard);
        assert_eq!(RunOptions::default().passthrough, StderrPassthrough::Inherit);
    }

    struct FailingRunner;

    impl ProcessRunner for FailingRunner {
        fn run(
            &self,
            cmd: &CommandSpec,
            _options: &RunOptions,
            _stderr_lines: &mut LineRing,
        ) -> Result<ProcessOutput, RunnerError> {
            Err(RunnerError::SpawnFailed {
                program: cmd.program_name(),
                reason: "mock error".to_string(),
            })
        }
    }

    #[test]
    fn test_process_runner_with_error() {
        let mut lines = LineRing::new(1);
        let result = FailingRunner.run(&CommandSpec::new("x"), &RunOptions::default(), &mut lines);
        match result {
            Err(RunnerError::SpawnFailed { program, reason }) => {
                assert_eq!(program, "x");
                assert_eq!(reason, "mock error");
            }
            other => panic!("Expected SpawnFailed error, got {other:?}"),
        }
    }
}
