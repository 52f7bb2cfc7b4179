#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs a `fmt` subscriber writing to stderr, filtered by `RUST_LOG`
/// (default `warn`). Stdout stays reserved for command output. Calling it
/// twice is harmless.
pub fn init_tracing_subscriber() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
