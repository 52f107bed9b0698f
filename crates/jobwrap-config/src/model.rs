use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::builder::WorkerConfigBuilder;
use crate::error::ConfigError;

/// Number of trailing stderr lines reported as warnings unless configured.
pub const DEFAULT_WARNING_LINES: usize = 5;

/// Environment variable holding the queue server host.
pub const QUEUE_HOST_ENV: &str = "JOBWRAP_QUEUE_HOST";
/// Environment variable holding the queue server port.
pub const QUEUE_PORT_ENV: &str = "JOBWRAP_QUEUE_PORT";

/// How a job payload is handed to the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Payload is a command line; its words become extra arguments.
    Args,
    /// Payload is base64-encoded and passed as one trailing argument.
    #[default]
    Payload,
}

impl ExecMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Args => "args",
            Self::Payload => "payload",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "args" => Ok(Self::Args),
            "payload" => Ok(Self::Payload),
            other => Err(ConfigError::invalid(
                "mode",
                format!("unknown mode '{other}', expected 'args' or 'payload'"),
            )),
        }
    }
}

/// Validated configuration for one worker.
///
/// A worker serves a single job name and runs `command` with the fixed `args`
/// followed by whatever the payload contributes (see [`ExecMode`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub mode: ExecMode,
    pub warning_lines: usize,
    /// `None` waits for the child indefinitely
    pub timeout: Option<Duration>,
}

impl WorkerConfig {
    #[must_use]
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder::new()
    }
}

/// Address of the job queue server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEndpoint {
    pub host: String,
    pub port: u16,
}

impl QueueEndpoint {
    /// Read the endpoint from `JOBWRAP_QUEUE_HOST` and `JOBWRAP_QUEUE_PORT`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEndpoint`] when either variable is unset or empty,
    /// [`ConfigError::InvalidValue`] when the port is not a number in range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but with an injectable variable source.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (Some(host), Some(port)) = (present(QUEUE_HOST_ENV), present(QUEUE_PORT_ENV)) else {
            return Err(ConfigError::MissingEndpoint);
        };

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid(QUEUE_PORT_ENV, format!("'{port}': {e}")))?;

        Ok(Self {
            host: host.trim().to_string(),
            port,
        })
    }

    /// `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
