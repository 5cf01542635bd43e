//! Boyce task worker entry point.

use clap::Parser;

use boyce_core::config::AppConfig;
use boyce_core::logging::init_logging;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(&config).await {
        tracing::error!("Worker command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
