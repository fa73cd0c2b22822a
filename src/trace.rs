//! Diagnostics sink
//!
//! The run function owns a [`Dispatch`] and scopes it with
//! `tracing::dispatcher::with_default`; nothing is installed globally.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Subscriber writing to stderr when tracing is enabled, a no-op otherwise
pub fn dispatch(enabled: bool) -> Dispatch {
    if !enabled {
        return Dispatch::none();
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    Dispatch::new(subscriber)
}
