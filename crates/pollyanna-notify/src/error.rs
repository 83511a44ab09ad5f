//! Error types for pollyanna-notify

use std::path::PathBuf;

use thiserror::Error;

/// Errors from composing or delivering one notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Participant has no contact address on file
    #[error("No contact address for {0}")]
    MissingContact(String),

    /// Outbox file could not be written
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Outbox bookkeeping failed
    #[error("Outbox error: {0}")]
    Outbox(String),

    /// Message could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status
    #[error("Delivery rejected with status {status}")]
    Rejected { status: u16 },

    /// Notifier is missing required settings
    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.to_string())
    }
}
