//! CLI command implementations

mod config;
mod report;
mod run_job;

pub use config::execute_config_command;
pub use report::{ConfigReport, JobReport};
pub use run_job::execute_run_command;
