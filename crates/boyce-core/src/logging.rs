//! Tracing subscriber setup.
//!
//! Logs are written to stdout as an event stream. `RUST_LOG` takes
//! precedence over the configured level.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;

/// Initialize tracing using the configured level and format.
pub fn init_logging(config: &AppConfig) {
    init_logging_with_level(config, config.log_level());
}

/// Initialize tracing with an explicit default level.
///
/// The admin CLI uses this with `"warn"` so that its stdout carries only
/// command output unless `RUST_LOG` or `LOG_LEVEL` asks for more.
pub fn init_logging_with_level(config: &AppConfig, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match config.log_format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
