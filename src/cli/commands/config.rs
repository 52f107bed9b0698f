//! `jobwrap config`: show the effective configuration

use anyhow::Context;
use jobwrap_config::{ConfigError, QUEUE_HOST_ENV, QUEUE_PORT_ENV, QueueEndpoint, ResolvedConfig};
use std::path::Path;

use super::report::{ConfigReport, ConfigValue};
use crate::cli::args::WorkerArgs;
use crate::error::CliError;

pub fn execute_config_command(
    worker: &WorkerArgs,
    json: bool,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let resolved = ResolvedConfig::discover(&worker.to_overrides(config_path))?;
    let command_path = which::which(&resolved.worker.command)
        .ok()
        .map(|p| p.display().to_string());
    let (queue, queue_error) = match QueueEndpoint::from_env() {
        Ok(endpoint) => (Some(endpoint), None),
        Err(ConfigError::MissingEndpoint) => (None, None),
        Err(err) => (None, Some(err.to_string())),
    };

    if json {
        let report = ConfigReport {
            schema_version: super::report::REPORT_SCHEMA_VERSION,
            config_file: resolved
                .config_path
                .as_ref()
                .map(|p| p.display().to_string()),
            values: resolved
                .effective_config()
                .into_iter()
                .map(|(key, (value, source))| (key, ConfigValue { value, source }))
                .collect(),
            command_path,
            queue,
            queue_error,
        };
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to emit config JSON")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Effective configuration:");
    match &resolved.config_path {
        Some(path) => println!("  config file: {}", path.display()),
        None => println!("  config file: (none found)"),
    }
    for (key, (value, source)) in resolved.effective_config() {
        println!("  {key:<14} = {value:<30} [{source}]");
    }

    match command_path {
        Some(path) => println!("  command path: {path}"),
        None => println!("  command path: not found on PATH"),
    }

    match (queue, queue_error) {
        (Some(endpoint), _) => println!("  queue: {}", endpoint.address()),
        (None, Some(err)) => println!("  queue: invalid ({err})"),
        (None, None) => println!("  queue: not configured (set {QUEUE_HOST_ENV} and {QUEUE_PORT_ENV})"),
    }

    Ok(())
}
