//! Command-line splitting for argument-forwarding jobs
//!
//! Turns a job payload such as `"arg with quotes" second third` into the
//! argument vector a POSIX shell would produce, without running a shell.
//!
//! Very long alphanumeric runs are swapped for placeholders while splitting
//! and restored afterwards (see [`substitution`]); the result is the same as
//! splitting the original string.

pub mod error;
pub mod substitution;
mod tokenizer;

pub use error::TokenizeError;
pub use substitution::{LONG_RUN_THRESHOLD, SubstitutionTable};
pub use tokenizer::{Tokenizer, tokenize};
