//! Built-in task handlers.
//!
//! Each task simulates work with a fixed sleep and returns a literal result
//! mapping. None of them has side effects beyond logging.

pub mod cleanup;
pub mod data;
pub mod email;
pub mod report;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::job::Job;

pub use cleanup::CleanupHandler;
pub use data::ProcessDataHandler;
pub use email::SendEmailHandler;
pub use report::GenerateReportHandler;

/// Task name of [`ProcessDataHandler`].
pub const PROCESS_DATA: &str = "process_data";
/// Task name of [`SendEmailHandler`].
pub const SEND_EMAIL: &str = "send_email";
/// Task name of [`GenerateReportHandler`].
pub const GENERATE_REPORT: &str = "generate_report_task";
/// Task name of [`CleanupHandler`].
pub const CLEANUP: &str = "cleanup_task";

/// Register all four built-in task handlers.
pub fn register_default_handlers(executor: &mut JobExecutor) {
    executor.register(Arc::new(ProcessDataHandler));
    executor.register(Arc::new(SendEmailHandler));
    executor.register(Arc::new(GenerateReportHandler));
    executor.register(Arc::new(CleanupHandler));
}

/// An executor with every built-in handler registered.
pub fn default_executor() -> JobExecutor {
    let mut executor = JobExecutor::new();
    register_default_handlers(&mut executor);
    executor
}

fn required_arg<'a>(job: &'a Job, position: usize, name: &str) -> Result<&'a Value, JobExecutionError> {
    job.payload.arg(position, name).ok_or_else(|| {
        JobExecutionError::Permanent(format!(
            "Task '{}' is missing required argument '{}'",
            job.job_type, name
        ))
    })
}

fn required_str<'a>(job: &'a Job, position: usize, name: &str) -> Result<&'a str, JobExecutionError> {
    required_arg(job, position, name)?.as_str().ok_or_else(|| {
        JobExecutionError::Permanent(format!(
            "Task '{}' expects argument '{}' to be a string",
            job.job_type, name
        ))
    })
}

/// Seconds since the Unix epoch with microsecond precision.
fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use serde_json::{Map, Value};
    use uuid::Uuid;

    use crate::job::{Job, JobPayload};

    pub fn job(job_type: &str, args: Vec<Value>) -> Job {
        job_with_kwargs(job_type, args, Map::new())
    }

    pub fn job_with_kwargs(job_type: &str, args: Vec<Value>, kwargs: Map<String, Value>) -> Job {
        Job {
            id: Uuid::new_v4(),
            job_type: job_type.to_string(),
            queue: "default".to_string(),
            payload: JobPayload { args, kwargs },
            created_at: Utc::now(),
        }
    }
}
