//! Pollyanna Core: constrained Secret Santa draw
//!
//! Every participant gives two gifts a year, a genuine one and a gag one,
//! to two different people. Nobody draws themselves, and nobody draws a
//! recipient they already had for that gift within the last few years.
//!
//! ## Key Components
//!
//! - `History` / `build_exclusion_index`: rolling-window memory of past draws
//! - `match_participants`: one greedy randomized derangement per category
//! - `generate` / `PairingGenerator`: rejection-sampling loop over both
//!   categories with a retry cap

pub mod config;
pub mod error;
pub mod history;
pub mod matcher;
pub mod model;
pub mod obs;
pub mod pairing;
pub mod telemetry;

pub use config::{DrawConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MEMORY_LENGTH};
pub use error::{InfeasibleMatchingError, PairingError, Result};
pub use history::{
    build_exclusion_index, memory_window, CategoryExclusions, ExclusionIndex, ExclusionLookup,
    History,
};
pub use matcher::match_participants;
pub use model::{Category, Pair, PairingResult, Year, YearRecord, YearlyAssignment};
pub use pairing::{generate, PairingGenerator};
pub use telemetry::init_tracing;

/// Pollyanna version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
