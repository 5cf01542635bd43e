//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use boyce_core::error::AppError;

use crate::job::Job;

/// Trait for task handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Task name this handler is registered under
    fn job_type(&self) -> &str;

    /// Run the task and return its result mapping
    async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError>;
}

/// Error from job execution. Jobs are never retried.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Bad arguments or unknown task
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler based on job_type
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler, replacing any handler with the same name
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!("Registered task handler '{}'", job_type);
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for task '{}'",
                job.job_type
            ))
        })?;

        tracing::debug!(job_id = %job.id, task = %job.job_type, "Executing job");

        handler.execute(job).await
    }

    /// Check if a handler is registered for a task name
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// Registered task names, sorted
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}
