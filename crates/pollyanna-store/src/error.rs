//! Error types for pollyanna-store

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving draw state
#[derive(Error, Debug)]
pub enum StoreError {
    /// File could not be read or written
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Participant file is not a name -> contact object
    #[error("Invalid participants file: {0}")]
    InvalidParticipants(String),

    /// History file exists but is not a year -> record object
    #[error("Malformed history file: {0}")]
    MalformedHistory(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
