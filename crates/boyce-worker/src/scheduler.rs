//! Cron scheduler for the periodic task table.
//!
//! Cron expressions use six fields (seconds first) and are evaluated in UTC.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use boyce_core::error::AppError;

use crate::job::JobCreateParams;
use crate::jobs::{CLEANUP, GENERATE_REPORT};
use crate::queue::JobQueue;

/// One row of the periodic schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Entry name
    pub name: &'static str,
    /// Task to enqueue
    pub task: &'static str,
    /// Cron expression
    pub cron: &'static str,
    /// Positional arguments passed to the task
    pub args: Vec<Value>,
}

/// The built-in schedule: nightly cleanup and a Monday morning report.
pub fn default_schedule() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry {
            name: "daily-cleanup",
            task: CLEANUP,
            cron: "0 0 2 * * *",
            args: Vec::new(),
        },
        ScheduleEntry {
            name: "weekly-report",
            task: GENERATE_REPORT,
            cron: "0 0 1 * * Mon",
            args: vec![json!("weekly")],
        },
    ]
}

/// Enqueue one run of a schedule entry on the default queue.
pub async fn enqueue_scheduled(queue: &JobQueue, entry: &ScheduleEntry) -> Result<(), AppError> {
    let params = JobCreateParams::new(entry.task).with_args(entry.args.clone());
    let job = queue.enqueue(params).await?;
    tracing::info!(
        "Scheduled '{}' enqueued task '{}' as job {}",
        entry.name,
        entry.task,
        job.id
    );
    Ok(())
}

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, queue })
    }

    /// Register every entry of [`default_schedule`]
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        for entry in default_schedule() {
            self.register(entry).await?;
        }

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Register a single schedule entry
    pub async fn register(&self, entry: ScheduleEntry) -> Result<(), AppError> {
        let name = entry.name;
        let cron = entry.cron;
        let queue = Arc::clone(&self.queue);
        let entry = Arc::new(entry);

        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            let entry = Arc::clone(&entry);
            Box::pin(async move {
                tracing::debug!("Schedule '{}' fired", entry.name);
                if let Err(e) = enqueue_scheduled(&queue, &entry).await {
                    tracing::error!("Failed to enqueue {}: {}", entry.task, e);
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create {} schedule: {}", name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {} schedule: {}", name, e)))?;

        tracing::info!("Registered: {} ({})", name, cron);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
