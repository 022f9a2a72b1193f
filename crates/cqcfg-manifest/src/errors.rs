use std::io;
use thiserror::Error;

/// Errors that can occur while synthesizing or persisting a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Sequence version {sequence} + revision count {revisions} overflows")]
    SequenceOverflow { sequence: u64, revisions: u64 },
}
