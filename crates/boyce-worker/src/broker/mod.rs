//! Broker and result backend abstractions.

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;
use boyce_core::result::AppResult;

use crate::job::{Job, JobResult};

pub use self::memory::MemoryBroker;
pub use self::redis::RedisBroker;

/// Seconds a result record is kept before it expires.
pub const RESULT_TTL_SECONDS: u64 = 86_400;

/// Transport that carries jobs from producers to workers.
#[async_trait]
pub trait JobBroker: Send + Sync + std::fmt::Debug {
    /// Append a job to the tail of its queue.
    async fn push(&self, job: &Job) -> AppResult<()>;

    /// Take the job at the head of `queue`, if any.
    async fn pop(&self, queue: &str) -> AppResult<Option<Job>>;

    /// Number of jobs waiting on `queue`.
    async fn pending(&self, queue: &str) -> AppResult<u64>;
}

/// Storage for job status and return values.
#[async_trait]
pub trait ResultBackend: Send + Sync + std::fmt::Debug {
    /// Insert or replace the record for `result.job_id`.
    async fn store(&self, result: &JobResult) -> AppResult<()>;

    /// Fetch the record for `job_id`, if it exists and has not expired.
    async fn fetch(&self, job_id: Uuid) -> AppResult<Option<JobResult>>;
}

/// Which broker implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    /// Redis lists and keys
    Redis,
    /// In-process queues; only visible inside the current process
    Memory,
}

impl std::str::FromStr for BrokerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::configuration(format!(
                "Unknown WORKER_BROKER '{other}', expected 'redis' or 'memory'"
            ))),
        }
    }
}

/// The broker and result backend a process talks to.
#[derive(Debug, Clone)]
pub struct Brokers {
    /// Job transport
    pub broker: Arc<dyn JobBroker>,
    /// Result storage
    pub results: Arc<dyn ResultBackend>,
}

impl Brokers {
    /// Connect to the broker and result backend named by configuration.
    ///
    /// When the broker and result backend URLs are the same a single Redis
    /// connection serves both.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        match config.worker_broker.parse::<BrokerKind>()? {
            BrokerKind::Memory => {
                tracing::warn!("Using in-memory broker; jobs are not shared between processes");
                let broker = Arc::new(MemoryBroker::new());
                Ok(Self {
                    broker: broker.clone(),
                    results: broker,
                })
            }
            BrokerKind::Redis => {
                let broker = Arc::new(RedisBroker::connect(config.broker_url()).await?);
                let results: Arc<dyn ResultBackend> =
                    if config.result_backend_url() == config.broker_url() {
                        broker.clone()
                    } else {
                        Arc::new(RedisBroker::connect(config.result_backend_url()).await?)
                    };
                Ok(Self { broker, results })
            }
        }
    }
}
