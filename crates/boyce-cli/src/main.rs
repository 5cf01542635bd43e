//! Boyce admin CLI entry point.

use clap::Parser;
use clap::error::{ContextKind, ErrorKind};

use boyce_core::config::AppConfig;
use boyce_core::logging::init_logging_with_level;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => std::process::exit(report_parse_error(e)),
    };

    let Some(command) = cli.command else {
        print!("{}", commands::usage());
        std::process::exit(1);
    };

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    let level = config.log_level.clone().unwrap_or_else(|| "warn".to_string());
    init_logging_with_level(&config, &level);

    if let Err(e) = command.execute(&config).await {
        output::print_error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}

/// Print a command-line parse error and return the exit code.
fn report_parse_error(err: clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        ErrorKind::InvalidSubcommand => {
            let name = err
                .get(ContextKind::InvalidSubcommand)
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!("Unknown command: {}", name);
            println!("Run 'boyce-manage' to see available commands");
            1
        }
        _ => {
            let _ = err.print();
            print!("{}", commands::usage());
            1
        }
    }
}
