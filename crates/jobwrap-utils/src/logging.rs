//! Logging and observability infrastructure for jobwrap
//!
//! Structured logging via `tracing`. Every log line goes to stderr: stdout
//! of the worker is reserved for job results.

use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize tracing subscriber for structured logging
///
/// Sets up tracing with either compact (default) or verbose format.
/// `RUST_LOG` takes precedence over both.
///
/// # Arguments
/// * `verbose` - If true, log at debug level with targets and span timings
///
/// # Returns
/// Result indicating success or failure of initialization
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_directives = if verbose {
        "jobwrap=debug,info"
    } else {
        "jobwrap=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Verbose: targets plus a close event with timings for each job span
    let span_events = if verbose {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_span_events(span_events)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

/// Create a span for one job with structured fields
pub fn job_span(job_name: &str, job_id: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "job",
        job_name = %job_name,
        job_id = %job_id,
    )
}

/// Log job start
pub fn log_job_start(job_name: &str, job_id: &str) {
    info!(job_name = %job_name, job_id = %job_id, "Running job");
}

/// Log job completion with duration
pub fn log_job_complete(job_name: &str, job_id: &str, duration_ms: u128) {
    info!(
        job_name = %job_name,
        job_id = %job_id,
        duration_ms = %duration_ms,
        "Finished job"
    );
}

/// Log job failure with its error kind and message
pub fn log_job_error(job_name: &str, job_id: &str, kind: &str, error: &str, duration_ms: u128) {
    error!(
        job_name = %job_name,
        job_id = %job_id,
        kind = %kind,
        duration_ms = %duration_ms,
        error = %error,
        "Job failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_span_does_not_panic_without_subscriber() {
        let span = job_span("resize", "job-1");
        let _guard = span.enter();
        log_job_start("resize", "job-1");
        log_job_complete("resize", "job-1", 12);
        log_job_error("resize", "job-1", "child_exit", "exit status 2", 3);
    }

    #[test]
    fn test_init_tracing_twice_reports_error() {
        // The first call may or may not win depending on test ordering; the
        // second one must fail instead of panicking.
        let _ = init_tracing(false);
        assert!(init_tracing(true).is_err());
    }
}
