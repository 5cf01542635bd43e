//! In-process broker and result backend.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use boyce_core::result::AppResult;

use super::{JobBroker, ResultBackend};
use crate::job::{Job, JobResult};

/// FIFO queues and result records held in memory.
///
/// Results never expire.
#[derive(Debug, Default)]
pub struct MemoryBroker {
    queues: Mutex<HashMap<String, VecDeque<Job>>>,
    results: DashMap<Uuid, JobResult>,
}

impl MemoryBroker {
    /// Create an empty broker
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobBroker for MemoryBroker {
    async fn push(&self, job: &Job) -> AppResult<()> {
        self.queues
            .lock()
            .await
            .entry(job.queue.clone())
            .or_default()
            .push_back(job.clone());
        Ok(())
    }

    async fn pop(&self, queue: &str) -> AppResult<Option<Job>> {
        Ok(self
            .queues
            .lock()
            .await
            .get_mut(queue)
            .and_then(VecDeque::pop_front))
    }

    async fn pending(&self, queue: &str) -> AppResult<u64> {
        Ok(self
            .queues
            .lock()
            .await
            .get(queue)
            .map_or(0, |q| q.len() as u64))
    }
}

#[async_trait]
impl ResultBackend for MemoryBroker {
    async fn store(&self, result: &JobResult) -> AppResult<()> {
        self.results.insert(result.job_id, result.clone());
        Ok(())
    }

    async fn fetch(&self, job_id: Uuid) -> AppResult<Option<JobResult>> {
        Ok(self.results.get(&job_id).map(|r| r.value().clone()))
    }
}
