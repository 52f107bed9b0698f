//! JSON documents printed by `--json`

use chrono::{DateTime, Utc};
use jobwrap_config::QueueEndpoint;
use jobwrap_engine::{JobErrorKind, JobOutcome, RecordedJob};
use serde::Serialize;
use std::collections::BTreeMap;

pub const REPORT_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failure,
}

/// Outcome of one `jobwrap run`
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub schema_version: &'static str,
    pub job_name: String,
    pub job_id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<JobErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Result decoded lossily as UTF-8
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub result_bytes: usize,
    pub warnings: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl JobReport {
    #[must_use]
    pub fn new(
        job_name: &str,
        job_id: &str,
        job: &RecordedJob,
        outcome: &JobOutcome,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let (status, error_kind, error, data) = match outcome {
            JobOutcome::Success(data) => (JobStatus::Success, None, None, Some(data.as_slice())),
            JobOutcome::Failure { kind, message } => {
                (JobStatus::Failure, Some(*kind), Some(message.clone()), None)
            }
        };

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            job_name: job_name.to_string(),
            job_id: job_id.to_string(),
            status,
            error_kind,
            error,
            result: data.map(|d| String::from_utf8_lossy(d).into_owned()),
            result_bytes: data.map_or(0, <[u8]>::len),
            warnings: job.warning_strings(),
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue {
    pub value: String,
    pub source: String,
}

/// Effective configuration for `jobwrap config --json`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub schema_version: &'static str,
    pub config_file: Option<String>,
    pub values: BTreeMap<String, ConfigValue>,
    /// Command resolved against PATH, if found
    pub command_path: Option<String>,
    pub queue: Option<QueueEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_error: Option<String>,
}
