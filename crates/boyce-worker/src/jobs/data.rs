//! Data processing task.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::Job;

use super::{PROCESS_DATA, required_arg, unix_timestamp};

const SIMULATED_WORK: Duration = Duration::from_secs(2);

/// `process_data(data)`: echoes its input back with a processing timestamp.
#[derive(Debug, Default)]
pub struct ProcessDataHandler;

#[async_trait]
impl JobHandler for ProcessDataHandler {
    fn job_type(&self) -> &str {
        PROCESS_DATA
    }

    async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError> {
        let data = required_arg(job, 0, "data")?.clone();
        tracing::info!(job_id = %job.id, "Processing data: {}", data);

        tokio::time::sleep(SIMULATED_WORK).await;

        let result = json!({
            "processed_at": unix_timestamp(),
            "input_data": data,
            "status": "completed",
        });

        tracing::info!(job_id = %job.id, "Data processing completed: {}", result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::test_support;

    #[tokio::test(start_paused = true)]
    async fn test_status_is_completed_for_any_input() {
        for input in [json!({"user": 7, "tags": ["a", "b"]}), json!(null), json!("raw")] {
            let job = test_support::job(PROCESS_DATA, vec![input.clone()]);
            let result = ProcessDataHandler.execute(&job).await.unwrap();
            assert_eq!(result["status"], "completed");
            assert_eq!(result["input_data"], input);
            assert!(result["processed_at"].is_f64());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_for_simulated_work() {
        let job = test_support::job(PROCESS_DATA, vec![json!(1)]);
        let start = tokio::time::Instant::now();
        ProcessDataHandler.execute(&job).await.unwrap();
        assert!(start.elapsed() >= SIMULATED_WORK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_data_fails() {
        let job = test_support::job(PROCESS_DATA, vec![]);
        let err = ProcessDataHandler.execute(&job).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }
}
