//! Exit code constants for the jobwrap binary.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Job completed successfully |
//! | 1 | `INTERNAL` | Internal failure inside the worker |
//! | 2 | `NAME_MISSING` | No job name given (flag or config file) |
//! | 3 | `COMMAND_MISSING` | No command given (flag or config file) |
//! | 4 | `CONFIG_INVALID` | Configuration file or value rejected |
//! | 5 | `IO` | Payload could not be read or result could not be written |
//! | 70 | `JOB_FAILED` | The wrapped command failed or could not run |

use std::fmt;

/// Exit codes matching the documented exit code table.
///
/// Library code never exits; only the binary maps errors to one of these.
///
/// # Example
///
/// ```rust
/// use jobwrap_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::COMMAND_MISSING.as_i32(), 3);
/// assert_eq!(ExitCode::from_i32(70), ExitCode::JOB_FAILED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - job completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - fault inside the worker itself
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Job name missing
    pub const NAME_MISSING: ExitCode = ExitCode(2);

    /// Command missing
    pub const COMMAND_MISSING: ExitCode = ExitCode(3);

    /// Configuration rejected
    pub const CONFIG_INVALID: ExitCode = ExitCode(4);

    /// Payload or result I/O failed
    pub const IO: ExitCode = ExitCode(5);

    /// The wrapped command failed
    pub const JOB_FAILED: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    /// Short machine-readable name for known codes
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            0 => "success",
            1 => "internal",
            2 => "name_missing",
            3 => "command_missing",
            4 => "config_invalid",
            5 => "io",
            70 => "job_failed",
            _ => "unknown",
        }
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values_are_stable() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::NAME_MISSING.as_i32(), 2);
        assert_eq!(ExitCode::COMMAND_MISSING.as_i32(), 3);
        assert_eq!(ExitCode::CONFIG_INVALID.as_i32(), 4);
        assert_eq!(ExitCode::IO.as_i32(), 5);
        assert_eq!(ExitCode::JOB_FAILED.as_i32(), 70);
    }

    #[test]
    fn test_exit_code_round_trip_i32() {
        let code: ExitCode = 3.into();
        assert_eq!(code, ExitCode::COMMAND_MISSING);
        let raw: i32 = code.into();
        assert_eq!(raw, 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(ExitCode::JOB_FAILED.to_string(), "70 (job_failed)");
        assert_eq!(ExitCode::from_i32(42).to_string(), "42 (unknown)");
    }
}
