//! Atomic file writes
//!
//! Result files are written to a temporary file in the target directory,
//! fsynced, then renamed over the target so readers never observe a partial
//! result.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Atomically write `content` to `path` using temp file + fsync + rename.
///
/// Content is written byte-for-byte; job results may be binary.
pub fn write_bytes_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;

    temp_file
        .write_all(content)
        .context("Failed to write content to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    temp_file
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to atomically write file: {}", path.display()))?;

    Ok(())
}
