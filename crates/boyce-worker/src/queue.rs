//! Job queue: enqueuing, dequeuing, and result bookkeeping on top of a
//! broker and result backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing;
use uuid::Uuid;

use boyce_core::result::AppResult;

use crate::broker::{Brokers, JobBroker, ResultBackend};
use crate::job::{Job, JobCreateParams, JobResult, JobStatus};

/// Job queue for enqueuing work and recording outcomes
#[derive(Debug, Clone)]
pub struct JobQueue {
    broker: Arc<dyn JobBroker>,
    results: Arc<dyn ResultBackend>,
    worker_id: String,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(
        broker: Arc<dyn JobBroker>,
        results: Arc<dyn ResultBackend>,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            results,
            worker_id: worker_id.into(),
        }
    }

    /// Create a job queue over connected brokers
    pub fn from_brokers(brokers: Brokers, worker_id: impl Into<String>) -> Self {
        Self::new(brokers.broker, brokers.results, worker_id)
    }

    /// Identifier recorded on results this queue writes
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a new job and record it as pending
    pub async fn enqueue(&self, params: JobCreateParams) -> AppResult<Job> {
        let job = Job {
            id: Uuid::new_v4(),
            job_type: params.job_type,
            queue: params.queue,
            payload: params.payload,
            created_at: Utc::now(),
        };

        self.results.store(&JobResult::pending(&job)).await?;
        self.broker.push(&job).await?;

        tracing::debug!(
            "Enqueued job: id={}, type='{}', queue='{}'",
            job.id,
            job.job_type,
            job.queue
        );

        Ok(job)
    }

    /// Dequeue the next available job, trying queues in the given order
    pub async fn dequeue(&self, queues: &[&str]) -> AppResult<Option<Job>> {
        for queue in queues {
            if let Some(job) = self.broker.pop(queue).await? {
                tracing::debug!(
                    "Dequeued job: id={}, type='{}', queue='{}'",
                    job.id,
                    job.job_type,
                    job.queue
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as picked up by this worker
    pub async fn mark_running(&self, job: &Job) -> AppResult<()> {
        self.record(job, JobStatus::Running, None, None).await
    }

    /// Mark a job as completed successfully
    pub async fn complete(&self, job: &Job, result: Value) -> AppResult<()> {
        self.record(job, JobStatus::Completed, Some(result), None)
            .await?;
        tracing::debug!("Job completed: id={}", job.id);
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job: &Job, error: &str) -> AppResult<()> {
        self.record(job, JobStatus::Failed, None, Some(error.to_string()))
            .await?;
        tracing::debug!("Job failed: id={}, error='{}'", job.id, error);
        Ok(())
    }

    /// Fetch the result record for a job
    pub async fn result(&self, job_id: Uuid) -> AppResult<Option<JobResult>> {
        self.results.fetch(job_id).await
    }

    /// Get queue statistics
    pub async fn stats(&self, queues: &[&str]) -> AppResult<QueueStats> {
        let mut pending = BTreeMap::new();
        for queue in queues {
            pending.insert(queue.to_string(), self.broker.pending(queue).await?);
        }

        Ok(QueueStats {
            pending,
            worker_id: self.worker_id.clone(),
        })
    }

    async fn record(
        &self,
        job: &Job,
        status: JobStatus,
        result: Option<Value>,
        error: Option<String>,
    ) -> AppResult<()> {
        self.results
            .store(&JobResult {
                job_id: job.id,
                job_type: job.job_type.clone(),
                status,
                result,
                error,
                worker_id: Some(self.worker_id.clone()),
                updated_at: Utc::now(),
            })
            .await
    }
}

/// Queue statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    /// Waiting jobs per queue
    pub pending: BTreeMap<String, u64>,
    /// Current worker identifier
    pub worker_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MemoryBroker;
    use serde_json::json;

    fn make_queue() -> JobQueue {
        let broker = Arc::new(MemoryBroker::new());
        JobQueue::new(broker.clone(), broker, "worker-test")
    }

    #[tokio::test]
    async fn test_enqueue_records_pending_result() {
        let queue = make_queue();
        let job = queue
            .enqueue(JobCreateParams::new("cleanup_task"))
            .await
            .unwrap();

        let record = queue.result(job.id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Pending);
        assert_eq!(record.job_type, "cleanup_task");
        assert_eq!(record.worker_id, None);
    }

    #[tokio::test]
    async fn test_dequeue_respects_queue_order() {
        let queue = make_queue();
        queue
            .enqueue(JobCreateParams::new("cleanup_task").on_queue("low"))
            .await
            .unwrap();
        let urgent = queue
            .enqueue(JobCreateParams::new("send_email").on_queue("high"))
            .await
            .unwrap();

        let next = queue.dequeue(&["high", "low"]).await.unwrap().unwrap();
        assert_eq!(next.id, urgent.id);
    }

    #[tokio::test]
    async fn test_complete_and_fail_update_result() {
        let queue = make_queue();
        let ok = queue
            .enqueue(JobCreateParams::new("cleanup_task"))
            .await
            .unwrap();
        let bad = queue
            .enqueue(JobCreateParams::new("send_email"))
            .await
            .unwrap();

        queue.mark_running(&ok).await.unwrap();
        assert_eq!(
            queue.result(ok.id).await.unwrap().unwrap().status,
            JobStatus::Running
        );

        queue
            .complete(&ok, json!({"status": "cleaned"}))
            .await
            .unwrap();
        queue.fail(&bad, "missing argument").await.unwrap();

        let ok_record = queue.result(ok.id).await.unwrap().unwrap();
        assert_eq!(ok_record.status, JobStatus::Completed);
        assert_eq!(ok_record.result, Some(json!({"status": "cleaned"})));
        assert_eq!(ok_record.worker_id.as_deref(), Some("worker-test"));

        let bad_record = queue.result(bad.id).await.unwrap().unwrap();
        assert_eq!(bad_record.status, JobStatus::Failed);
        assert_eq!(bad_record.error.as_deref(), Some("missing argument"));
    }

    #[tokio::test]
    async fn test_stats_counts_pending() {
        let queue = make_queue();
        for _ in 0..3 {
            queue
                .enqueue(JobCreateParams::new("cleanup_task"))
                .await
                .unwrap();
        }

        let stats = queue.stats(&["default", "other"]).await.unwrap();
        assert_eq!(stats.pending["default"], 3);
        assert_eq!(stats.pending["other"], 0);
        assert_eq!(stats.worker_id, "worker-test");
    }
}
