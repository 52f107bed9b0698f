use std::time::Duration;

use crate::error::ConfigError;
use crate::model::{DEFAULT_WARNING_LINES, ExecMode, WorkerConfig};

/// Builder for [`WorkerConfig`].
///
/// # Example
///
/// ```rust
/// use jobwrap_config::{ExecMode, WorkerConfig};
/// use std::time::Duration;
///
/// let config = WorkerConfig::builder()
///     .name("resize")
///     .command("/usr/local/bin/resize")
///     .arg("--fast")
///     .mode(ExecMode::Args)
///     .timeout(Duration::from_secs(300))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.warning_lines, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkerConfigBuilder {
    name: Option<String>,
    command: Option<String>,
    args: Vec<String>,
    mode: Option<ExecMode>,
    warning_lines: Option<usize>,
    timeout: Option<Duration>,
}

impl WorkerConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: ExecMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Number of trailing stderr lines kept per job; 0 keeps none.
    #[must_use]
    pub fn warning_lines(mut self, lines: usize) -> Self {
        self.warning_lines = Some(lines);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Name is checked before command, so a config missing both reports
    /// [`ConfigError::MissingName`]. A zero timeout is rejected.
    pub fn build(self) -> Result<WorkerConfig, ConfigError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ConfigError::MissingName)?;

        let command = self
            .command
            .filter(|c| !c.trim().is_empty())
            .ok_or(ConfigError::MissingCommand)?;

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::invalid("timeout", "must be greater than zero"));
        }

        Ok(WorkerConfig {
            name,
            command,
            args: self.args,
            mode: self.mode.unwrap_or_default(),
            warning_lines: self.warning_lines.unwrap_or(DEFAULT_WARNING_LINES),
            timeout: self.timeout,
        })
    }
}
