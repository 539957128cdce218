//! Logging setup and run counters.
//!
//! Diagnostics go to stderr through `tracing`; artifacts and summaries are
//! the only thing written to stdout.

pub mod stats;

pub use stats::{RunStats, StatsSnapshot};

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives; takes precedence over
/// `RUST_LOG`.
pub const LOG_ENV: &str = "SIGCODEGEN_LOG";

pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global stderr subscriber. Calling it again is a no-op.
pub fn init_logging(verbosity: u8) {
    let default_level = LevelFilter::from_level(level_for_verbosity(verbosity));
    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => builder.parse_lossy(directives),
        Err(_) => builder.from_env_lossy(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
