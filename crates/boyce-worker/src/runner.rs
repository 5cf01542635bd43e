//! Worker runner: main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::job::{DEFAULT_QUEUE, Job};
use crate::queue::JobQueue;

/// How long shutdown waits for in-flight jobs.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Main worker runner that polls queues and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Maximum jobs executing at once
    concurrency: usize,
    /// Idle wait between empty polls
    poll_interval: Duration,
    /// Worker identifier
    worker_id: String,
    /// Queues to poll (in priority order)
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner polling the default queue
    pub fn new(
        queue: Arc<JobQueue>,
        executor: Arc<JobExecutor>,
        concurrency: usize,
        poll_interval: Duration,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            executor,
            concurrency: concurrency.max(1),
            poll_interval,
            worker_id: worker_id.into(),
            queues: vec![DEFAULT_QUEUE.to_string()],
        }
    }

    /// Set the queues to poll
    pub fn with_queues(mut self, queues: Vec<String>) -> Self {
        if !queues.is_empty() {
            self.queues = queues;
        }
        self
    }

    /// Queues this runner polls, in priority order
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// Start the worker runner; runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Worker '{}' started with concurrency={}, poll_interval={:?}, queues={:?}",
            self.worker_id,
            self.concurrency,
            self.poll_interval,
            self.queues
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        loop {
            if *cancel.borrow() {
                tracing::info!("Worker '{}' received shutdown signal", self.worker_id);
                break;
            }

            if self.poll_and_execute(&semaphore).await {
                continue;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Worker '{}' shutting down", self.worker_id);
                        break;
                    }
                }
                _ = time::sleep(self.poll_interval) => {}
            }
        }

        tracing::info!(
            "Worker '{}' waiting for in-flight jobs to complete...",
            self.worker_id
        );

        let permits = u32::try_from(self.concurrency).unwrap_or(u32::MAX);
        if time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(
                "Worker '{}' gave up waiting for in-flight jobs after {:?}",
                self.worker_id,
                DRAIN_TIMEOUT
            );
        }

        tracing::info!("Worker '{}' shut down complete", self.worker_id);
    }

    /// Poll for a job and spawn it if one is available.
    ///
    /// Returns `true` when a job was picked up.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(p) => p,
            Err(_) => {
                tracing::trace!("All worker slots occupied, waiting...");
                return false;
            }
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(|s| s.as_str()).collect();

        match self.queue.dequeue(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);

                tokio::spawn(async move {
                    let _permit = permit;
                    process_job(&queue, &executor, job).await;
                });
                true
            }
            Ok(None) => {
                tracing::trace!("No jobs available in queues");
                false
            }
            Err(e) => {
                tracing::error!("Failed to dequeue job: {}", e);
                false
            }
        }
    }
}

/// Run one job to completion and record its outcome. Failures are final.
async fn process_job(queue: &JobQueue, executor: &JobExecutor, job: Job) {
    let job_id = job.id;
    tracing::info!("Processing job: id={}, type='{}'", job_id, job.job_type);

    if let Err(e) = queue.mark_running(&job).await {
        tracing::error!("Failed to mark job {} as running: {}", job_id, e);
    }

    let outcome = match executor.execute(&job).await {
        Ok(result) => {
            tracing::info!("Job {} completed successfully", job_id);
            queue.complete(&job, result).await
        }
        Err(JobExecutionError::Permanent(msg)) => {
            tracing::error!("Job {} failed: {}", job_id, msg);
            queue.fail(&job, &msg).await
        }
        Err(JobExecutionError::Internal(err)) => {
            let msg = err.to_string();
            tracing::error!("Job {} internal error: {}", job_id, msg);
            queue.fail(&job, &msg).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!("Failed to record result of job {}: {}", job_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MemoryBroker;
    use crate::job::{JobCreateParams, JobStatus};
    use crate::jobs::{self, CLEANUP};
    use serde_json::json;

    fn setup() -> (Arc<JobQueue>, Arc<JobExecutor>) {
        let broker = Arc::new(MemoryBroker::new());
        let queue = Arc::new(JobQueue::new(broker.clone(), broker, "worker-test"));
        (queue, Arc::new(jobs::default_executor()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_runner_executes_job_and_records_result() {
        let (queue, executor) = setup();
        let job = queue
            .enqueue(JobCreateParams::new(CLEANUP))
            .await
            .unwrap();

        let runner = WorkerRunner::new(
            Arc::clone(&queue),
            executor,
            2,
            Duration::from_secs(1),
            "worker-test",
        );
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { runner.run(rx).await });

        time::sleep(Duration::from_secs(10)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let record = queue.result(job.id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(
            record.result,
            Some(json!({"status": "cleaned", "items_removed": 42}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_task_is_recorded_as_failed() {
        let (queue, executor) = setup();
        let job = queue
            .enqueue(JobCreateParams::new("no_such_task"))
            .await
            .unwrap();

        let runner = WorkerRunner::new(
            Arc::clone(&queue),
            executor,
            1,
            Duration::from_secs(1),
            "worker-test",
        );
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { runner.run(rx).await });

        time::sleep(Duration::from_secs(2)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let record = queue.result(job.id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.error.unwrap().contains("no_such_task"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_in_flight_job() {
        let (queue, executor) = setup();
        let job = queue
            .enqueue(JobCreateParams::new(CLEANUP))
            .await
            .unwrap();

        let runner = WorkerRunner::new(
            Arc::clone(&queue),
            executor,
            1,
            Duration::from_millis(100),
            "worker-test",
        );
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { runner.run(rx).await });

        // Cleanup sleeps for 3s; stop well before it finishes.
        time::sleep(Duration::from_millis(500)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let record = queue.result(job.id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Completed);
    }

    #[test]
    fn test_empty_queue_list_keeps_default() {
        let (queue, executor) = setup();
        let runner = WorkerRunner::new(queue, executor, 1, Duration::from_secs(1), "w")
            .with_queues(Vec::new());
        assert_eq!(runner.queues(), &["default".to_string()]);
    }
}
