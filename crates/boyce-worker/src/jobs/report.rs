//! Report generation task.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::Job;

use super::{GENERATE_REPORT, required_str, unix_timestamp};

const SIMULATED_WORK: Duration = Duration::from_secs(5);

/// `generate_report_task(report_type)`: produces an empty report of the
/// requested type.
#[derive(Debug, Default)]
pub struct GenerateReportHandler;

#[async_trait]
impl JobHandler for GenerateReportHandler {
    fn job_type(&self) -> &str {
        GENERATE_REPORT
    }

    async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError> {
        let report_type = required_str(job, 0, "report_type")?;
        tracing::info!(job_id = %job.id, "Generating {} report", report_type);

        tokio::time::sleep(SIMULATED_WORK).await;

        let report = json!({
            "type": report_type,
            "generated_at": unix_timestamp(),
            "status": "completed",
        });

        tracing::info!(job_id = %job.id, "Report generation completed: {}", report);
        Ok(report)
    }
}
