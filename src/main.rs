//! Boyce web process.
//!
//! Reads configuration from the environment, sets up logging, and serves
//! the HTTP API until Ctrl+C or SIGTERM.

use boyce_core::config::AppConfig;
use boyce_core::logging::init_logging;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = boyce_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
