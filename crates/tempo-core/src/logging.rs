//! Tracing setup for embedders and tests.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Filter comes from `TEMPO_LOG` (falling back to `RUST_LOG`, then the
/// given default). Safe to call more than once; later calls are no-ops.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_env("TEMPO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
