//! Logging setup for the `lpcdoc` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. Logs go to stderr so stdout stays clean in stdin mode.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `verbose` wins over `quiet`; with neither, `RUST_LOG` is honored and the
/// default level is `warn`.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("lpcdoc=debug")
    } else if quiet {
        EnvFilter::new("lpcdoc=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lpcdoc=warn"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
