//! Pollyanna Store: persistence for participants and draw history
//!
//! Everything lives in two JSON files:
//!
//! - participants: `{ "name": "contact", ... }`
//! - history: `{ "2023": { "regular": {..}, "gag": {..} }, ... }`
//!
//! History is read leniently: a year key that is not an integer, or a year
//! value of the wrong shape, is skipped with a warning rather than failing
//! the run. Writes are atomic (temp file + rename).

mod error;
pub mod fakes;
pub mod history;
pub mod participants;

pub use error::StoreError;
pub use history::{parse_history, render_history, HistoryStore, JsonHistoryStore};
pub use participants::{load_participants, parse_participants, Participants};

/// Result type for pollyanna-store operations
pub type Result<T> = std::result::Result<T, StoreError>;
