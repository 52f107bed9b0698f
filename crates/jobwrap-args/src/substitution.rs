//! Placeholder substitution for very long alphanumeric runs.
//!
//! Before splitting, each maximal alphanumeric run longer than the threshold
//! is swapped for a short alphanumeric placeholder; after splitting, the
//! placeholders are swapped back inside every token. Placeholders contain
//! only alphanumerics, so they split exactly like the runs they replace.

use std::collections::HashMap;

/// Runs longer than this many bytes are replaced by placeholders.
pub const LONG_RUN_THRESHOLD: usize = 250;

/// Hex digits of the content hash kept in a placeholder
const HASH_DIGITS: usize = 32;

/// Placeholder → original run, valid for a single tokenize call.
#[derive(Debug, Default)]
pub struct SubstitutionTable {
    entries: HashMap<String, String>,
}

impl SubstitutionTable {
    /// Replace every alphanumeric run longer than `threshold` bytes in
    /// `commandline`, returning the rewritten line and the table needed to
    /// restore it.
    pub fn build(commandline: &str, threshold: usize) -> (String, Self) {
        let mut table = Self::default();
        let mut rewritten = String::with_capacity(commandline.len());
        let mut last = 0;

        for (index, (start, run)) in alphanumeric_runs(commandline).enumerate() {
            if run.len() <= threshold {
                continue;
            }
            let placeholder = placeholder_for(run, index);
            rewritten.push_str(&commandline[last..start]);
            rewritten.push_str(&placeholder);
            last = start + run.len();
            table.entries.insert(placeholder, run.to_string());
        }

        if table.entries.is_empty() {
            return (commandline.to_string(), table);
        }

        rewritten.push_str(&commandline[last..]);
        tracing::debug!(
            substitutions = table.entries.len(),
            "Replaced long alphanumeric runs before splitting"
        );
        (rewritten, table)
    }

    /// Put the original runs back into a token.
    pub fn restore(&self, token: String) -> String {
        if self.entries.is_empty() {
            return token;
        }
        let mut token = token;
        for (placeholder, original) in &self.entries {
            if token.contains(placeholder.as_str()) {
                token = token.replace(placeholder.as_str(), original);
            }
        }
        token
    }

    /// Number of substituted runs
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was substituted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash prefix plus zero-padded position, so identical runs at different
/// positions get distinct placeholders and no placeholder is a prefix of
/// another.
fn placeholder_for(run: &str, index: usize) -> String {
    let hash = blake3::hash(run.as_bytes()).to_hex();
    format!("{}{:08}", &hash.as_str()[..HASH_DIGITS], index)
}

/// Maximal runs of alphanumeric characters with their byte offsets.
fn alphanumeric_runs(s: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut chars = s.char_indices().peekable();
    std::iter::from_fn(move || {
        let (start, _) = loop {
            let (idx, c) = chars.next()?;
            if c.is_alphanumeric() {
                break (idx, c);
            }
        };
        let mut end = s.len();
        while let Some(&(idx, c)) = chars.peek() {
            if !c.is_alphanumeric() {
                end = idx;
                break;
            }
            chars.next();
        }
        Some((start, &s[start..end]))
    })
}
