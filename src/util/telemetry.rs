//! Structured logging setup for hosts embedding the engine.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: engine transitions at `info`,
/// everything else at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,recolection_engine=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_LOG_FILTER`]. Returns `false` if a subscriber was already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
