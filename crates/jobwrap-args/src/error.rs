//! Error types for argument splitting

use thiserror::Error;

/// Reasons a command line cannot be split into arguments.
///
/// No partial argument list is ever returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated {quote} quote starting at byte {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    #[error("payload is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}
