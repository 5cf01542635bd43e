//! `status`: print the effective configuration.

use boyce_core::config::{AppConfig, mask_url};
use boyce_core::error::AppError;

use crate::output;

/// Execute the status command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    output::print_header("Boyce Application Status");
    output::print_kv("Environment", &config.environment);
    output::print_kv("Version", &config.app_version);
    output::print_kv("Debug Mode", &config.debug.to_string());
    output::print_kv("Port", &config.port.to_string());
    output::print_kv("Database URL", &mask_url(&config.database_url));
    output::print_kv("Redis URL", &mask_url(&config.redis_url));
    Ok(())
}
