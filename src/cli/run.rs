//! CLI entry point and dispatch logic

use clap::Parser;
use jobwrap_utils::exit_codes::ExitCode;
use jobwrap_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;
use crate::error::CliError;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns the exit code to use on
/// failure; main.rs only calls `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let config_path = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Run(args) => commands::execute_run_command(args, config_path),
        Commands::Config { worker, json } => {
            commands::execute_config_command(worker, *json, config_path)
        }
    };

    result.map_err(|err| report(&err))
}

fn report(err: &CliError) -> ExitCode {
    let code = err.to_exit_code();
    eprintln!("✗ {err}");
    tracing::debug!(exit_code = %code, "Exiting with error");
    code
}
