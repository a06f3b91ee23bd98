//! Logging for the queues.
//!
//! Events are emitted through `tracing` when the default `tracing` feature
//! is on. Without it the `trace!` and `debug!` used by the queues expand to
//! nothing.

/// Filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "blockq=trace";

/// Installs a global formatter for queue events, filtered by `RUST_LOG`
/// or [`DEFAULT_DIRECTIVE`].
///
/// Returns `true` if this call installed the subscriber. Later calls, or
/// calls after the application installed its own subscriber, leave it in
/// place and return `false`. Always returns `false` without the `tracing`
/// feature.
#[cfg(feature = "tracing")]
pub fn init_tracing() -> bool {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() -> bool {
    false
}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! discard {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use discard as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use discard as trace;
