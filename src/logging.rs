//! Tracing subscriber setup.
//!
//! Logs go to stderr so `solve`/`analyze`/`sample` can write JSON to stdout.
//! `RUST_LOG` wins over the per-command default level.

use tracing_subscriber::{EnvFilter, fmt};

pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // `try_init` so repeated calls (tests, embedding) do not panic.
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
