//! Level file errors
//!
//! `NotFound` is recoverable (the loop keeps its previous map); everything
//! else means the data on disk cannot be trusted and is fatal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read/write map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("map at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("tile key {key:?} does not match its grid position")]
    InvalidKey { key: String },
}

impl MapError {
    /// Classify an I/O failure, splitting "file absent" from everything else
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            MapError::NotFound { path }
        } else {
            MapError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MapError::NotFound { .. })
    }
}
