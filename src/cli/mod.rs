//! Command-line interface for jobwrap
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: entry point and command dispatch
//! - `commands`: command implementations

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, RunArgs, WorkerArgs};
pub use commands::{ConfigReport, JobReport};
pub use run::run;
