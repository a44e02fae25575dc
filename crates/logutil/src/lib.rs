//! Utilities for logging.

use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Initialize the global trace subscriber for a binary.
///
/// The default level is derived from the verbosity count. A `RUST_LOG`
/// directive takes precedence when set.
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Initialize a trace subscriber for tests.
///
/// Output is captured per test. Safe to call multiple times.
pub fn init_test() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
