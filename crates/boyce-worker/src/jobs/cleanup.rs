//! Periodic cleanup task.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::Job;

use super::CLEANUP;

const SIMULATED_WORK: Duration = Duration::from_secs(3);
const ITEMS_REMOVED: u64 = 42;

/// `cleanup_task()`: takes no arguments and reports a fixed removal count.
/// Any argument fails the job.
#[derive(Debug, Default)]
pub struct CleanupHandler;

#[async_trait]
impl JobHandler for CleanupHandler {
    fn job_type(&self) -> &str {
        CLEANUP
    }

    async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError> {
        if !job.payload.args.is_empty() || !job.payload.kwargs.is_empty() {
            return Err(JobExecutionError::Permanent(format!(
                "Task '{}' takes no arguments ({} positional, {} keyword given)",
                job.job_type,
                job.payload.args.len(),
                job.payload.kwargs.len()
            )));
        }

        tracing::info!(job_id = %job.id, "Running cleanup task");

        tokio::time::sleep(SIMULATED_WORK).await;

        tracing::info!(job_id = %job.id, "Cleanup task completed");
        Ok(json!({
            "status": "cleaned",
            "items_removed": ITEMS_REMOVED,
        }))
    }
}
