use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use jobwrap_args::Tokenizer;
use jobwrap_config::{ExecMode, WorkerConfig};
use jobwrap_runner::{CommandSpec, NativeRunner, ProcessRunner, RunOptions, StderrPassthrough};
use jobwrap_utils::LineRing;
use jobwrap_utils::logging::{job_span, log_job_complete, log_job_error, log_job_start};
use std::time::Instant;
use tracing::debug;

use crate::error::JobError;
use crate::job::Job;

/// Environment variable carrying the job name into the child.
pub const JOB_NAME_ENV: &str = "JOBWRAP_JOB_NAME";
/// Environment variable carrying the job id into the child.
pub const JOB_ID_ENV: &str = "JOBWRAP_JOB_ID";

/// Runs jobs for one configured worker.
///
/// Each call to [`process`](Self::process) starts the configured command
/// once, returns its stdout as the job result, and reports the last
/// `warning_lines` lines of its stderr through [`Job::emit_warning`].
/// Nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct JobExecutor<R = NativeRunner> {
    config: WorkerConfig,
    runner: R,
    tokenizer: Tokenizer,
    passthrough: StderrPassthrough,
}

impl JobExecutor<NativeRunner> {
    #[must_use]
    pub fn new(config: WorkerConfig) -> Self {
        Self::with_runner(config, NativeRunner::new())
    }
}

impl<R: ProcessRunner> JobExecutor<R> {
    #[must_use]
    pub fn with_runner(config: WorkerConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            tokenizer: Tokenizer::new(),
            passthrough: StderrPassthrough::Inherit,
        }
    }

    /// Choose where child stderr is copied while it runs.
    #[must_use]
    pub fn with_passthrough(mut self, passthrough: StderrPassthrough) -> Self {
        self.passthrough = passthrough;
        self
    }

    #[must_use]
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The command line a job would run, without running it.
    ///
    /// # Errors
    ///
    /// [`JobError::Tokenize`] when an argument-forwarding payload cannot be
    /// split.
    pub fn build_command(&self, job: &dyn Job) -> Result<CommandSpec, JobError> {
        let cmd = CommandSpec::new(&self.config.command)
            .args(&self.config.args)
            .env(JOB_NAME_ENV, &self.config.name)
            .env(JOB_ID_ENV, job.unique_id());

        let cmd = match self.config.mode {
            ExecMode::Args => cmd.args(self.tokenizer.tokenize_bytes(job.payload())?),
            ExecMode::Payload => cmd.arg(BASE64.encode(job.payload())),
        };

        Ok(cmd)
    }

    /// Run one job to completion.
    ///
    /// On success returns the child's stdout. Captured stderr lines are
    /// delivered to the job whenever the child actually ran, before this
    /// returns. An [`JobError::Internal`] failure is also delivered as one
    /// warning.
    ///
    /// # Errors
    ///
    /// See [`JobError`].
    pub fn process(&self, job: &mut dyn Job) -> Result<Vec<u8>, JobError> {
        let job_id = job.unique_id().to_string();
        let name = self.config.name.as_str();
        let span = job_span(name, &job_id);
        let _guard = span.enter();

        let started = Instant::now();
        log_job_start(name, &job_id);

        let result = self.execute(job);
        let duration_ms = started.elapsed().as_millis();

        match &result {
            Ok(data) => {
                debug!(bytes = data.len(), "Collected job result");
                log_job_complete(name, &job_id, duration_ms);
            }
            Err(err) => {
                let message = err.to_string();
                if matches!(err, JobError::Internal { .. }) {
                    job.emit_warning(message.as_bytes());
                }
                log_job_error(name, &job_id, err.kind().as_str(), &message, duration_ms);
            }
        }

        result
    }

    fn execute(&self, job: &mut dyn Job) -> Result<Vec<u8>, JobError> {
        let cmd = self.build_command(job)?;
        debug!(program = %cmd.program_name(), args = cmd.args.len(), mode = %self.config.mode, "Starting command");

        let options = RunOptions::default()
            .with_timeout(self.config.timeout)
            .with_passthrough(self.passthrough);
        let mut diagnostics = LineRing::new(self.config.warning_lines);

        let run = self.runner.run(&cmd, &options, &mut diagnostics);
        flush_diagnostics(job, &mut diagnostics);

        let output = run?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(JobError::ChildExit {
                status: output.status_text(),
            })
        }
    }
}

fn flush_diagnostics(job: &mut dyn Job, diagnostics: &mut LineRing) {
    if diagnostics.was_truncated() {
        debug!(
            kept = diagnostics.len(),
            total = diagnostics.total_lines(),
            "Dropped older stderr lines"
        );
    }
    for line in diagnostics.drain() {
        job.emit_warning(&line);
    }
}
