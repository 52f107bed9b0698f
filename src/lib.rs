//! jobwrap: run an external command once per queued job
//!
//! A worker is configured with a job name and a command. For each job the
//! command runs once: the payload becomes its arguments (split like a shell
//! would, or base64-encoded as a single argument), its stdout becomes the job
//! result, and the last few lines of its stderr become job warnings.
//!
//! The library surface re-exports the workspace crates:
//!
//! - [`JobExecutor`], [`Job`], [`complete`]: job execution
//! - [`WorkerConfig`], [`ResolvedConfig`], [`QueueEndpoint`]: configuration
//! - [`Tokenizer`]: command-line splitting
//! - [`NativeRunner`], [`ProcessRunner`]: child process supervision

pub mod cli;
pub mod error;

pub use error::CliError;
pub use jobwrap_args::{TokenizeError, Tokenizer, tokenize};
pub use jobwrap_config::{
    CliOverrides, ConfigError, ConfigSource, ExecMode, QueueEndpoint, ResolvedConfig, WorkerConfig,
    WorkerConfigBuilder,
};
pub use jobwrap_engine::{
    Job, JobError, JobErrorKind, JobExecutor, JobOutcome, RecordedJob, complete,
};
pub use jobwrap_runner::{CommandSpec, NativeRunner, ProcessRunner, RunnerError};
pub use jobwrap_utils::LineRing;
pub use jobwrap_utils::exit_codes::ExitCode;
