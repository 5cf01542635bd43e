//! # boyce-core
//!
//! Core crate for Boyce. Contains the environment-driven configuration,
//! logging setup, shutdown signal handling, and the unified error system
//! used by the web process, the admin CLI, and the task worker.
//!
//! This crate has **no** internal dependencies on other Boyce crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod shutdown;

pub use config::AppConfig;
pub use error::AppError;
pub use result::AppResult;
