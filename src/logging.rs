// src/logging.rs
// =============================================================================
// tracing setup.
//
// Logs go to stderr so stdout stays clean for --json output and the chat.
// RUST_LOG, when set, overrides the configured level.
// =============================================================================

use tracing_subscriber::EnvFilter;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn init_logging(level: &str) {
    let known = LEVELS.contains(&level);
    let effective = if known { level } else { "warn" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if !known {
        tracing::warn!("Invalid log level '{}', defaulting to 'warn'", level);
    }
}
