use crate::error::RunnerError;
use crate::pipes::{collect_stdout, forward_stderr};
use jobwrap_utils::LineRing;
use std::io::{self, Write};
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CommandSpec, ProcessOutput, ProcessRunner, RunOptions, StderrPassthrough};

// ============================================================================
// NativeRunner - direct child process execution
// ============================================================================

/// Native process runner using `tokio::process::Command`.
///
/// Stdout is collected in full. Stderr is copied to a passthrough sink as it
/// arrives and its lines are recorded in the caller's [`LineRing`]. Both
/// pipes are drained at the same time, so a child that fills one of them
/// never stalls.
///
/// # Threading
///
/// Each run drives a private current-thread tokio runtime. When called from
/// inside another tokio runtime, the run is moved to a scoped thread so the
/// caller's runtime is never re-entered. The call still blocks, so async
/// callers should prefer `spawn_blocking`.
///
/// # Example
///
/// ```rust,no_run
/// use jobwrap_runner::{CommandSpec, NativeRunner, ProcessRunner, RunOptions};
/// use jobwrap_utils::LineRing;
///
/// let mut lines = LineRing::new(5);
/// let cmd = CommandSpec::new("echo").arg("hello");
/// let output = NativeRunner::new()
///     .run(&cmd, &RunOptions::default(), &mut lines)
///     .unwrap();
/// assert_eq!(output.stdout, b"hello\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    /// Create a new `NativeRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run `cmd`, copying its stderr to `sink` instead of this process's stderr.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessRunner::run`].
    pub fn run_with_sink<W>(
        &self,
        cmd: &CommandSpec,
        timeout: Option<Duration>,
        stderr_lines: &mut LineRing,
        sink: &mut W,
    ) -> Result<ProcessOutput, RunnerError>
    where
        W: Write + Send + ?Sized,
    {
        if tokio::runtime::Handle::try_current().is_err() {
            return drive(cmd, timeout, stderr_lines, sink);
        }

        debug!(
            program = %cmd.program_name(),
            "Inside a tokio runtime, supervising on a scoped thread"
        );
        std::thread::scope(|scope| {
            scope
                .spawn(|| drive(cmd, timeout, stderr_lines, sink))
                .join()
                .unwrap_or_else(|_| {
                    Err(RunnerError::RuntimeUnavailable {
                        reason: "supervisor thread panicked".to_string(),
                    })
                })
        })
    }
}

/// Build a private runtime and supervise `cmd` to completion on it.
fn drive<W>(
    cmd: &CommandSpec,
    timeout: Option<Duration>,
    stderr_lines: &mut LineRing,
    sink: &mut W,
) -> Result<ProcessOutput, RunnerError>
where
    W: Write + ?Sized,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RunnerError::RuntimeUnavailable {
            reason: e.to_string(),
        })?;

    runtime.block_on(supervise(cmd, timeout, stderr_lines, sink))
}

impl ProcessRunner for NativeRunner {
    fn run(
        &self,
        cmd: &CommandSpec,
        options: &RunOptions,
        stderr_lines: &mut LineRing,
    ) -> Result<ProcessOutput, RunnerError> {
        match options.passthrough {
            StderrPassthrough::Inherit => {
                let mut stderr = io::stderr();
                self.run_with_sink(cmd, options.timeout, stderr_lines, &mut stderr)
            }
            StderrPassthrough::Discard => {
                let mut sink = io::sink();
                self.run_with_sink(cmd, options.timeout, stderr_lines, &mut sink)
            }
        }
    }
}

async fn supervise<W>(
    cmd: &CommandSpec,
    timeout: Option<Duration>,
    stderr_lines: &mut LineRing,
    sink: &mut W,
) -> Result<ProcessOutput, RunnerError>
where
    W: Write + ?Sized,
{
    let mut command = cmd.to_tokio_command();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group so a timeout kill reaches grandchildren holding the pipes.
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
        program: cmd.program_name(),
        reason: e.to_string(),
    })?;
    let pid = child.id();
    debug!(program = %cmd.program_name(), pid = ?pid, args = cmd.args.len(), "Spawned child");

    let stdout_pipe = child
        .stdout
        .take()
        .ok_or(RunnerError::PipeUnavailable { stream: "stdout" })?;
    let stderr_pipe = child
        .stderr
        .take()
        .ok_or(RunnerError::PipeUnavailable { stream: "stderr" })?;

    let stdout_task = collect_stdout(stdout_pipe);
    let stderr_task = forward_stderr(stderr_pipe, stderr_lines, sink);
    let child_ref = &mut child;
    let run_to_exit = async move {
        let (stdout, seen) = tokio::join!(stdout_task, stderr_task);
        let stdout = stdout.map_err(|e| RunnerError::PipeRead {
            stream: "stdout",
            reason: e.to_string(),
        })?;
        let seen = seen.map_err(|e| RunnerError::PipeRead {
            stream: "stderr",
            reason: e.to_string(),
        })?;
        let status = child_ref
            .wait()
            .await
            .map_err(|e| RunnerError::WaitFailed {
                reason: e.to_string(),
            })?;
        Ok::<_, RunnerError>(ProcessOutput::from_status(stdout, status, seen))
    };

    let finished = match timeout {
        Some(limit) => tokio::time::timeout(limit, run_to_exit).await.ok(),
        None => Some(run_to_exit.await),
    };

    match finished {
        Some(result) => result,
        None => {
            let limit = timeout.unwrap_or_default();
            warn!(
                program = %cmd.program_name(),
                timeout_seconds = limit.as_secs(),
                "Child timed out, killing"
            );
            terminate_group(pid);
            if let Err(err) = child.kill().await {
                debug!(error = %err, "Kill after timeout failed");
            }
            Err(RunnerError::Timeout {
                timeout_seconds: limit.as_secs(),
            })
        }
    }
}

/// SIGKILL the child's process group.
fn terminate_group(pid: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Some(raw) = pid.and_then(|p| i32::try_from(p).ok()) else {
            return;
        };
        if let Err(err) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
            debug!(pid = raw, error = %err, "killpg failed");
        }
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
    }
}
