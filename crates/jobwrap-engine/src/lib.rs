//! Job execution for jobwrap
//!
//! A [`JobExecutor`] turns a [`Job`] into one run of the configured command:
//! the payload becomes arguments (or one base64 argument), stdout becomes the
//! result, and the tail of stderr becomes warnings.

pub mod error;
mod executor;
mod job;
mod outcome;

pub use error::{JobError, JobErrorKind};
pub use executor::{JOB_ID_ENV, JOB_NAME_ENV, JobExecutor};
pub use job::{Job, RecordedJob};
pub use outcome::{JobOutcome, complete};
