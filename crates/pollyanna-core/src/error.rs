//! Error types for the draw.

use thiserror::Error;

/// A single matching pass stranded a participant with no legal recipient.
///
/// Expected and retryable: an earlier random choice can strand a later
/// participant even when a complete matching exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no legal recipient left for {participant} after {assigned} assignments")]
pub struct InfeasibleMatchingError {
    pub participant: String,
    pub assigned: usize,
}

/// Errors surfaced to the caller of a draw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    /// Retry cap reached without a valid pairing
    #[error(
        "no valid pairing for {participants} participants with memory length {memory_length} \
         after {attempts} attempts; reduce the memory length or prune old history"
    )]
    InfeasibleConfiguration {
        attempts: usize,
        participants: usize,
        memory_length: usize,
    },

    /// A draw needs at least two people
    #[error("at least 2 participants are required, got {0}")]
    TooFewParticipants(usize),

    /// Names are the participant key and must be unique
    #[error("duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// Configuration rejected before drawing
    #[error("invalid draw configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for draw operations
pub type Result<T> = std::result::Result<T, PairingError>;
