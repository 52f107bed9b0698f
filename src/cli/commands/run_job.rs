//! `jobwrap run`: execute one job locally

use anyhow::Context;
use chrono::Utc;
use jobwrap_config::ResolvedConfig;
use jobwrap_engine::{JobExecutor, JobOutcome, RecordedJob, complete};
use jobwrap_utils::payload_io::PayloadPath;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use super::report::JobReport;
use crate::cli::args::RunArgs;
use crate::error::CliError;

pub fn execute_run_command(args: &RunArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let resolved = ResolvedConfig::discover(&args.worker.to_overrides(config_path))?;
    let input = PayloadPath::parse(args.input.as_deref())?;
    let output = PayloadPath::parse(args.output.as_deref())?;

    let payload = input.read()?;
    let job_id = args
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let job_name = resolved.worker.name.clone();
    info!(
        job_name = %job_name,
        job_id = %job_id,
        payload_bytes = payload.len(),
        input = %input,
        "Accepted job"
    );

    let executor = JobExecutor::new(resolved.worker);
    let mut job = RecordedJob::new(job_id.clone(), payload);

    let started_at = Utc::now();
    let outcome = complete(&executor, &mut job);
    let finished_at = Utc::now();

    for line in job.warning_strings() {
        warn!(job_id = %job_id, "{line}");
    }

    if args.json {
        let report = JobReport::new(&job_name, &job_id, &job, &outcome, started_at, finished_at);
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to emit job report JSON")?;
        println!("{rendered}");
    }

    match outcome {
        JobOutcome::Success(data) => {
            // With --json the report already carries the result on stdout.
            if !(args.json && output == PayloadPath::Standard) {
                output.write(&data)?;
            }
            Ok(())
        }
        JobOutcome::Failure { kind, message } => Err(CliError::JobFailed { kind, message }),
    }
}
