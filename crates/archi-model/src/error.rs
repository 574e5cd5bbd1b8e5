#![forbid(unsafe_code)]

//! Errors from data providers and the list model.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from model-layer operations.
#[derive(Debug)]
pub enum ModelError {
    /// Reading or writing a backing file failed.
    Io {
        /// File the operation was targeting.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// An item list could not be encoded or decoded.
    Json(serde_json::Error),
}

impl ModelError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on {}: {source}", path.display()),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
