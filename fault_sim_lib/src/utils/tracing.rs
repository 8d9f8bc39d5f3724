//! Tracing initialization for the fault injection nodes.
//!
//! Uses a thread-local subscriber so the node does not fight with Dora's own
//! global tracing setup.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Default filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize tracing with a thread-local subscriber.
///
/// Respects `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]. The returned
/// guard must stay alive for as long as the node runs.
///
/// # Example
/// ```no_run
/// use fault_sim_lib::init_tracing;
///
/// fn main() {
///     let _guard = init_tracing();
///     // Node event loop here
/// }
/// ```
pub fn init_tracing() -> DefaultGuard {
    init_tracing_with_filter(DEFAULT_LOG_FILTER)
}

/// Same as [`init_tracing`] but with a caller-chosen fallback filter, e.g.
/// `"fault_injector=debug"` while chasing a joint mapping problem.
pub fn init_tracing_with_filter(fallback: &str) -> DefaultGuard {
    use tracing_subscriber::layer::SubscriberExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(fmt_layer);

    tracing::subscriber::set_default(subscriber)
}
