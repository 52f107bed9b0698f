use crate::error::TokenizeError;
use crate::substitution::{LONG_RUN_THRESHOLD, SubstitutionTable};

/// Splits command lines into arguments with POSIX shell quoting rules.
///
/// Only word splitting and quote removal are performed. Expansions,
/// globbing, and operators such as `;` or `|` are left as literal text, and
/// nothing is ever executed.
///
/// # Example
///
/// ```rust
/// use jobwrap_args::Tokenizer;
///
/// let args = Tokenizer::new()
///     .tokenize(r#""arg with quotes" secondArg 'third arg'"#)
///     .unwrap();
/// assert_eq!(args, vec!["arg with quotes", "secondArg", "third arg"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    long_run_threshold: Option<usize>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside quotes, either between words or inside an unquoted part
    Unquoted,
    SingleQuoted { start: usize },
    DoubleQuoted { start: usize },
    Comment,
}

impl Tokenizer {
    /// Tokenizer with long-run substitution enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            long_run_threshold: Some(LONG_RUN_THRESHOLD),
        }
    }

    /// Tokenizer that splits the input as-is.
    #[must_use]
    pub const fn without_substitution() -> Self {
        Self {
            long_run_threshold: None,
        }
    }

    /// Split `commandline` into arguments.
    pub fn tokenize(&self, commandline: &str) -> Result<Vec<String>, TokenizeError> {
        let Some(threshold) = self.long_run_threshold else {
            return split_words(commandline);
        };

        let (rewritten, table) = SubstitutionTable::build(commandline, threshold);
        let words = split_words(&rewritten)?;
        Ok(words.into_iter().map(|word| table.restore(word)).collect())
    }

    /// Split a raw payload, which must be UTF-8.
    pub fn tokenize_bytes(&self, payload: &[u8]) -> Result<Vec<String>, TokenizeError> {
        let commandline =
            std::str::from_utf8(payload).map_err(|e| TokenizeError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            })?;
        self.tokenize(commandline)
    }
}

/// Split with the default [`Tokenizer`].
pub fn tokenize(commandline: &str) -> Result<Vec<String>, TokenizeError> {
    Tokenizer::new().tokenize(commandline)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn split_words(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut word = String::new();
    // A word exists once any of its characters or quotes were seen, so `""`
    // yields an empty argument.
    let mut in_word = false;
    let mut state = State::Unquoted;
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match state {
            State::Unquoted => match c {
                c if is_blank(c) => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                '\'' => {
                    in_word = true;
                    state = State::SingleQuoted { start: offset };
                }
                '"' => {
                    in_word = true;
                    state = State::DoubleQuoted { start: offset };
                }
                '\\' => match chars.next() {
                    // line continuation
                    Some((_, '\n')) => {}
                    Some((_, escaped)) => {
                        word.push(escaped);
                        in_word = true;
                    }
                    None => {}
                },
                '#' if !in_word => state = State::Comment,
                c => {
                    word.push(c);
                    in_word = true;
                }
            },
            State::SingleQuoted { .. } => match c {
                '\'' => state = State::Unquoted,
                c => word.push(c),
            },
            State::DoubleQuoted { .. } => match c {
                '"' => state = State::Unquoted,
                '\\' => match chars.peek() {
                    Some(&(_, '\n')) => {
                        chars.next();
                    }
                    Some(&(_, escaped @ ('$' | '`' | '"' | '\\'))) => {
                        word.push(escaped);
                        chars.next();
                    }
                    _ => word.push('\\'),
                },
                c => word.push(c),
            },
            State::Comment => {
                if c == '\n' {
                    state = State::Unquoted;
                }
            }
        }
    }

    match state {
        State::SingleQuoted { start } => Err(TokenizeError::UnterminatedQuote {
            quote: '\'',
            offset: start,
        }),
        State::DoubleQuoted { start } => Err(TokenizeError::UnterminatedQuote {
            quote: '"',
            offset: start,
        }),
        State::Unquoted | State::Comment => {
            if in_word {
                words.push(word);
            }
            Ok(words)
        }
    }
}
