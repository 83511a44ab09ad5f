//! Tracing setup for the `pollyanna` binary.
//!
//! Pollyanna's own crates log at the requested level while dependencies
//! (HTTP client, runtime) stay at `warn`. `POLLYANNA_LOG`, then `RUST_LOG`,
//! override the defaults with any `EnvFilter` directive string.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "POLLYANNA_LOG";

const POLLYANNA_TARGETS: [&str; 4] = [
    "pollyanna",
    "pollyanna_core",
    "pollyanna_store",
    "pollyanna_notify",
];

/// Default filter: `warn` globally, `level` for every Pollyanna crate.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    POLLYANNA_TARGETS
        .iter()
        .fold(String::from("warn"), |mut directives, target| {
            directives.push_str(&format!(",{target}={level}"));
            directives
        })
}

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install the global subscriber once; later calls are no-ops.
///
/// * `json`: newline-delimited JSON, including the `pollyanna.draw` span.
/// * `level`: verbosity for Pollyanna's crates when no override is set.
pub fn init_tracing(json: bool, level: Level) {
    let filter = build_filter(level);

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).json().with_current_span(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json = json, level = %level, "Tracing initialised");
    }
}
