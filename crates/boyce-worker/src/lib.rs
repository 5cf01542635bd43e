//! Background task processing for Boyce.
//!
//! This crate provides:
//! - The four task handlers (`process_data`, `send_email`,
//!   `generate_report_task`, `cleanup_task`)
//! - A broker abstraction with Redis and in-memory implementations
//! - A worker runner that polls queues and executes jobs
//! - A cron scheduler for the periodic schedule table

pub mod broker;
pub mod executor;
pub mod job;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::JobExecutor;
pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
