//! Diagnostic logging for the CLI.
//!
//! Library crates log through the `log` facade. The subscriber installed here
//! forwards those records to stderr, keeping stdout free for command output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber; later calls are no-ops.
pub(crate) fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
    if let Err(err) = installed {
        log::debug!("logging already initialised: {err}");
    }
}
