//! Redis broker and result backend.
//!
//! Each queue is a Redis list at `boyce:queue:<name>`: producers `LPUSH`,
//! workers `RPOP`, giving FIFO order. Result records are JSON strings at
//! `boyce:result:<job id>` written with `SETEX`.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{debug, info};
use uuid::Uuid;

use boyce_core::config::mask_url;
use boyce_core::error::{AppError, ErrorKind};
use boyce_core::result::AppResult;

use super::{JobBroker, RESULT_TTL_SECONDS, ResultBackend};
use crate::job::{Job, JobResult};

const KEY_PREFIX: &str = "boyce:";

/// Redis-backed broker with a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisBroker {
    conn: ConnectionManager,
    url: String,
}

impl std::fmt::Debug for RedisBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBroker")
            .field("url", &mask_url(&self.url))
            .finish()
    }
}

impl RedisBroker {
    /// Connect to the Redis server at `url`.
    pub async fn connect(url: &str) -> AppResult<Self> {
        info!(url = %mask_url(url), "Connecting to Redis");

        let client = Client::open(url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Broker, "Failed to connect to Redis", e))?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            url: url.to_string(),
        })
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Broker, format!("Redis error: {e}"), e)
    }

    fn queue_key(queue: &str) -> String {
        format!("{KEY_PREFIX}queue:{queue}")
    }

    fn result_key(job_id: Uuid) -> String {
        format!("{KEY_PREFIX}result:{job_id}")
    }
}

#[async_trait]
impl JobBroker for RedisBroker {
    async fn push(&self, job: &Job) -> AppResult<()> {
        let body = serde_json::to_string(job)?;
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .lpush(Self::queue_key(&job.queue), body)
            .await
            .map_err(Self::map_err)?;
        debug!(job_id = %job.id, queue = %job.queue, "Pushed job to Redis");
        Ok(())
    }

    async fn pop(&self, queue: &str) -> AppResult<Option<Job>> {
        let mut conn = self.conn.clone();
        let body: Option<String> = conn
            .rpop(Self::queue_key(queue), None)
            .await
            .map_err(Self::map_err)?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    async fn pending(&self, queue: &str) -> AppResult<u64> {
        let mut conn = self.conn.clone();
        let len: u64 = conn
            .llen(Self::queue_key(queue))
            .await
            .map_err(Self::map_err)?;
        Ok(len)
    }
}

#[async_trait]
impl ResultBackend for RedisBroker {
    async fn store(&self, result: &JobResult) -> AppResult<()> {
        let body = serde_json::to_string(result)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::result_key(result.job_id), body, RESULT_TTL_SECONDS)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn fetch(&self, job_id: Uuid) -> AppResult<Option<JobResult>> {
        let mut conn = self.conn.clone();
        let body: Option<String> = conn
            .get(Self::result_key(job_id))
            .await
            .map_err(Self::map_err)?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(RedisBroker::queue_key("default"), "boyce:queue:default");
        assert_eq!(
            RedisBroker::result_key(Uuid::nil()),
            "boyce:result:00000000-0000-0000-0000-000000000000"
        );
    }
}
