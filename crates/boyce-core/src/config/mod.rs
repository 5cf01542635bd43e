//! Application configuration.
//!
//! Every setting comes from a process environment variable of the same name
//! (case-insensitive) and falls back to a hardcoded default when unset.
//! Values are read once at startup and never change afterwards.

pub mod url;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub use self::url::mask_url;

/// Root application configuration, shared by all three processes.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// `DEBUG`: enabled only when the value lowercases to `"true"`.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub debug: bool,
    /// `SECRET_KEY`. Never exposed over HTTP.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// `DATABASE_URL`.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// `REDIS_URL`. Fallback for the broker and result backend URLs.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// `PORT`: HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `APP_VERSION`.
    #[serde(default = "default_app_version")]
    pub app_version: String,
    /// `ENVIRONMENT`: deployment name, e.g. `development` or `production`.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// `CELERY_BROKER_URL`.
    #[serde(default)]
    pub celery_broker_url: Option<String>,
    /// `CELERY_RESULT_BACKEND`.
    #[serde(default)]
    pub celery_result_backend: Option<String>,
    /// `BIND_ADDRESS`: HTTP listen address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// `PROXY_TRUSTED_HOPS`: number of reverse proxies whose
    /// `X-Forwarded-*` headers are trusted.
    #[serde(default = "default_trusted_hops")]
    pub proxy_trusted_hops: usize,
    /// `LOG_LEVEL`: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default)]
    pub log_level: Option<String>,
    /// `LOG_FORMAT`: `"json"` or `"pretty"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// `WORKER_CONCURRENCY`: maximum number of jobs a worker runs at once.
    #[serde(default = "default_worker_concurrency")]
    pub worker_concurrency: usize,
    /// `WORKER_POLL_INTERVAL`: seconds between queue polls when idle.
    #[serde(default = "default_worker_poll_interval")]
    pub worker_poll_interval: u64,
    /// `WORKER_BROKER`: `"redis"` or `"memory"`.
    #[serde(default = "default_worker_broker")]
    pub worker_broker: String,
}

/// The non-sensitive subset of configuration served at `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeConfig {
    /// Debug mode flag.
    pub debug: bool,
    /// Deployment environment name.
    pub environment: String,
    /// Application version.
    pub version: String,
    /// HTTP listen port.
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, AppError> {
        Self::from_environment(config::Environment::default())
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment.
    pub fn from_env_map<I, K, V>(vars: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_environment(config::Environment::default().source(Some(map)))
    }

    fn from_environment(source: config::Environment) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(source.try_parsing(false))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Task broker URL: `CELERY_BROKER_URL`, else `REDIS_URL`.
    pub fn broker_url(&self) -> &str {
        self.celery_broker_url.as_deref().unwrap_or(&self.redis_url)
    }

    /// Task result backend URL: `CELERY_RESULT_BACKEND`, else `REDIS_URL`.
    pub fn result_backend_url(&self) -> &str {
        self.celery_result_backend
            .as_deref()
            .unwrap_or(&self.redis_url)
    }

    /// Default log filter: `LOG_LEVEL` when set, otherwise `debug` in debug
    /// mode and `info` elsewhere.
    pub fn log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.debug => "debug",
            None => "info",
        }
    }

    /// The subset of configuration that is safe to show to clients.
    pub fn safe_view(&self) -> SafeConfig {
        SafeConfig {
            debug: self.debug,
            environment: self.environment.clone(),
            version: self.app_version.clone(),
            port: self.port,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            secret_key: default_secret_key(),
            database_url: default_database_url(),
            redis_url: default_redis_url(),
            port: default_port(),
            app_version: default_app_version(),
            environment: default_environment(),
            celery_broker_url: None,
            celery_result_backend: None,
            bind_address: default_bind_address(),
            proxy_trusted_hops: default_trusted_hops(),
            log_level: None,
            log_format: default_log_format(),
            worker_concurrency: default_worker_concurrency(),
            worker_poll_interval: default_worker_poll_interval(),
            worker_broker: default_worker_broker(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("debug", &self.debug)
            .field("secret_key", &"****")
            .field("database_url", &mask_url(&self.database_url))
            .field("redis_url", &mask_url(&self.redis_url))
            .field("port", &self.port)
            .field("app_version", &self.app_version)
            .field("environment", &self.environment)
            .field("broker_url", &mask_url(self.broker_url()))
            .field("result_backend_url", &mask_url(self.result_backend_url()))
            .field("bind_address", &self.bind_address)
            .field("proxy_trusted_hops", &self.proxy_trusted_hops)
            .field("log_level", &self.log_level())
            .field("log_format", &self.log_format)
            .field("worker_concurrency", &self.worker_concurrency)
            .field("worker_poll_interval", &self.worker_poll_interval)
            .field("worker_broker", &self.worker_broker)
            .finish()
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.to_lowercase() == "true")
}

fn default_secret_key() -> String {
    "dev-key-change-in-production".to_string()
}

fn default_database_url() -> String {
    "sqlite:///app.db".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_trusted_hops() -> usize {
    1
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_worker_concurrency() -> usize {
    4
}

fn default_worker_poll_interval() -> u64 {
    1
}

fn default_worker_broker() -> String {
    "redis".to_string()
}
