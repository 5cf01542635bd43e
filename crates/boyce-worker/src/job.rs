//! Job envelope and result records exchanged through the broker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Queue used when none is specified.
pub const DEFAULT_QUEUE: &str = "default";

/// Task arguments: positional `args` and keyword `kwargs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// Positional arguments
    #[serde(default)]
    pub args: Vec<Value>,
    /// Keyword arguments
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl JobPayload {
    /// Look up an argument by keyword, falling back to its position.
    pub fn arg(&self, position: usize, name: &str) -> Option<&Value> {
        self.kwargs.get(name).or_else(|| self.args.get(position))
    }
}

/// A queued task invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier
    pub id: Uuid,
    /// Registered task name, e.g. `"process_data"`
    pub job_type: String,
    /// Queue the job was placed on
    pub queue: String,
    /// Task arguments
    pub payload: JobPayload,
    /// When the job was enqueued
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a new job
#[derive(Debug, Clone, PartialEq)]
pub struct JobCreateParams {
    /// Task name
    pub job_type: String,
    /// Queue name
    pub queue: String,
    /// Task arguments
    pub payload: JobPayload,
}

impl JobCreateParams {
    /// Parameters for `job_type` on the default queue with no arguments.
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            job_type: job_type.into(),
            queue: DEFAULT_QUEUE.to_string(),
            payload: JobPayload::default(),
        }
    }

    /// Set positional arguments
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.payload.args = args;
        self
    }

    /// Set keyword arguments
    pub fn with_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.payload.kwargs = kwargs;
        self
    }

    /// Place the job on a specific queue
    pub fn on_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting on the broker
    Pending,
    /// Picked up by a worker
    Running,
    /// Finished with a result
    Completed,
    /// Finished with an error
    Failed,
}

/// Record kept in the result backend for each job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job identifier
    pub job_id: Uuid,
    /// Task name
    pub job_type: String,
    /// Current status
    pub status: JobStatus,
    /// Task return value, once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure message, once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Worker that last touched the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// Time of the last status change
    pub updated_at: DateTime<Utc>,
}

impl JobResult {
    /// A fresh record for a job that was just enqueued.
    pub fn pending(job: &Job) -> Self {
        Self {
            job_id: job.id,
            job_type: job.job_type.clone(),
            status: JobStatus::Pending,
            result: None,
            error: None,
            worker_id: None,
            updated_at: Utc::now(),
        }
    }
}
