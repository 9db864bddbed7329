//! Error types for the line source.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a line source.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line} of {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        /// 1-based number of the line that could not be read
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Source already closed: {}", path.display())]
    Closed { path: PathBuf },
}

impl FileError {
    /// Classify an error returned while opening `path`.
    pub(crate) fn from_open(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            _ => FileError::Open { path, source },
        }
    }
}

/// Result type alias for line source operations.
pub type Result<T> = std::result::Result<T, FileError>;
