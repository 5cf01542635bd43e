//! `report`: write an administrative report to the working directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;
use boyce_core::result::AppResult;

use crate::output;

/// Report file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Generation time, UTC RFC 3339
    pub timestamp: String,
    /// Deployment environment
    pub environment: String,
    /// Application version
    pub version: String,
    /// Always `"healthy"`
    pub status: String,
}

impl Report {
    /// Build a report for `config` stamped with `now`.
    pub fn new(config: &AppConfig, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            environment: config.environment.clone(),
            version: config.app_version.clone(),
            status: "healthy".to_string(),
        }
    }
}

/// `report_<YYYYMMDD>_<HHMMSS>.json` for the given local time.
pub fn report_filename(now: DateTime<Local>) -> String {
    format!("report_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write a fresh report into `dir` and return its path.
pub async fn write_report(config: &AppConfig, dir: &Path) -> AppResult<PathBuf> {
    let report = Report::new(config, Utc::now());
    let path = dir.join(report_filename(Local::now()));

    let body = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&path, body).await.map_err(|e| {
        AppError::with_source(
            boyce_core::error::ErrorKind::Io,
            format!("Failed to write {}", path.display()),
            e,
        )
    })?;

    tracing::info!(path = %path.display(), "Report written");
    Ok(path)
}

/// Execute the report command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    println!("Generating administrative report...");

    let path = write_report(config, Path::new(".")).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    output::print_success(&format!("Report generated: {}", name));
    Ok(())
}
