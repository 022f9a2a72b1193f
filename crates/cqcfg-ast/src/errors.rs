use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A marker comment that carries a malformed field value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Invalid version in marker `{line}`: {reason}")]
    InvalidVersion { line: String, reason: String },
}

/// Errors that abort a source tree scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("{path}:{line}: syntax error")]
    Syntax { path: PathBuf, line: usize },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
