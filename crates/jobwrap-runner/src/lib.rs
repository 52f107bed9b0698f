//! Child process execution for jobwrap
//!
//! - [`CommandSpec`]: argv-style command description
//! - [`ProcessRunner`]: the execution seam, with [`NativeRunner`] as the real implementation
//! - [`RunnerError`]: failures to start or supervise a child

mod command_spec;
pub mod error;
mod native;
mod pipes;
mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner, RunOptions, StderrPassthrough};
