//! Reading job payloads and writing job results by path.
//!
//! A path is either empty or `-` (the process's stdin/stdout) or a local
//! file path. Object storage URLs are recognized only to be rejected.

use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::atomic_write::write_bytes_atomic;

const OBJECT_STORE_SCHEMES: &[&str] = &["s3://", "gs://", "az://"];

/// Errors from payload and result I/O
#[derive(Error, Debug)]
pub enum PayloadIoError {
    #[error("Object storage paths are not supported: {path}")]
    Unsupported { path: String },

    #[error("Failed to read payload from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write result to {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Where a payload comes from or a result goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPath {
    /// Stdin for reads, stdout for writes
    Standard,
    /// A local file
    Local(PathBuf),
}

impl PayloadPath {
    /// Classify a user-supplied path.
    pub fn parse(raw: Option<&str>) -> Result<Self, PayloadIoError> {
        match raw {
            None | Some("") | Some("-") => Ok(Self::Standard),
            Some(path) if OBJECT_STORE_SCHEMES.iter().any(|s| path.starts_with(s)) => {
                Err(PayloadIoError::Unsupported {
                    path: path.to_string(),
                })
            }
            Some(path) => Ok(Self::Local(PathBuf::from(path))),
        }
    }

    /// Read the whole payload.
    pub fn read(&self) -> Result<Vec<u8>, PayloadIoError> {
        match self {
            Self::Standard => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(|source| PayloadIoError::Read {
                        path: self.to_string(),
                        source,
                    })?;
                Ok(buf)
            }
            Self::Local(path) => std::fs::read(path).map_err(|source| PayloadIoError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Write the whole result. Local files are replaced atomically.
    pub fn write(&self, data: &[u8]) -> Result<(), PayloadIoError> {
        match self {
            Self::Standard => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(data)
                    .and_then(|()| stdout.flush())
                    .map_err(|e| PayloadIoError::Write {
                        path: self.to_string(),
                        reason: e.to_string(),
                    })
            }
            Self::Local(path) => write_local(path, data),
        }
    }
}

fn write_local(path: &Path, data: &[u8]) -> Result<(), PayloadIoError> {
    write_bytes_atomic(path, data).map_err(|e| PayloadIoError::Write {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })
}

impl fmt::Display for PayloadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "<stdio>"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_standard_paths() {
        assert_eq!(PayloadPath::parse(None).unwrap(), PayloadPath::Standard);
        assert_eq!(PayloadPath::parse(Some("")).unwrap(), PayloadPath::Standard);
        assert_eq!(PayloadPath::parse(Some("-")).unwrap(), PayloadPath::Standard);
    }

    #[test]
    fn test_parse_local_path() {
        assert_eq!(
            PayloadPath::parse(Some("/tmp/payload.txt")).unwrap(),
            PayloadPath::Local(PathBuf::from("/tmp/payload.txt"))
        );
    }

    #[test]
    fn test_parse_rejects_object_storage() {
        let err = PayloadPath::parse(Some("s3://bucket/key")).unwrap_err();
        assert!(matches!(err, PayloadIoError::Unsupported { .. }));
        assert!(err.to_string().contains("s3://bucket/key"));
    }

    #[test]
    fn test_local_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = PayloadPath::Local(temp_dir.path().join("out.bin"));

        path.write(b"arg1 arg2").unwrap();
        assert_eq!(path.read().unwrap(), b"arg1 arg2");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        let err = PayloadPath::Local(missing.clone()).read().unwrap_err();

        match err {
            PayloadIoError::Read { path, source } => {
                assert_eq!(path, missing.display().to_string());
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected Read error, got {other:?}"),
        }
    }
}
