//! Log output setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sends `tracing` output to stderr at `level`.
///
/// `RUST_LOG`, when set, overrides `level`. Only the first call in a process
/// installs a subscriber; later calls do nothing.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
