//! Worker command definitions and dispatch.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tokio::sync::watch;
use uuid::Uuid;

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;
use boyce_core::shutdown::shutdown_signal;

use boyce_worker::broker::Brokers;
use boyce_worker::job::{DEFAULT_QUEUE, JobCreateParams};
use boyce_worker::jobs;
use boyce_worker::scheduler::default_schedule;
use boyce_worker::{CronScheduler, JobQueue, WorkerRunner};

/// Boyce background task worker
#[derive(Debug, Parser)]
#[command(name = "boyce-worker", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// Consume and execute queued tasks
    Run {
        /// Also run the periodic scheduler in this process
        #[arg(long)]
        beat: bool,
        /// Queues to poll, in priority order
        #[arg(long, value_delimiter = ',', default_value = DEFAULT_QUEUE)]
        queues: Vec<String>,
        /// Maximum concurrent jobs (defaults to WORKER_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Enqueue a task by name
    Enqueue {
        /// Task name, e.g. process_data
        task: String,
        /// Positional arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,
        /// Keyword arguments as a JSON object
        #[arg(long, default_value = "{}")]
        kwargs: String,
        /// Target queue
        #[arg(long, default_value = DEFAULT_QUEUE)]
        queue: String,
    },
    /// Show the status and result of a job
    #[command(name = "result")]
    JobResult {
        /// Job identifier returned by `enqueue`
        job_id: Uuid,
    },
    /// Print the periodic schedule
    Schedule,
    /// Show pending job counts
    Stats {
        /// Queues to inspect
        #[arg(long, value_delimiter = ',', default_value = DEFAULT_QUEUE)]
        queues: Vec<String>,
    },
}

impl Cli {
    /// Execute the worker command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            WorkerCommand::Run {
                beat,
                queues,
                concurrency,
            } => run(config, *beat, queues.clone(), *concurrency).await,
            WorkerCommand::Enqueue {
                task,
                args,
                kwargs,
                queue,
            } => enqueue(config, task, args, kwargs, queue).await,
            WorkerCommand::JobResult { job_id } => show_result(config, *job_id).await,
            WorkerCommand::Schedule => {
                print_schedule();
                Ok(())
            }
            WorkerCommand::Stats { queues } => stats(config, queues).await,
        }
    }
}

fn worker_id() -> String {
    format!("worker-{}", std::process::id())
}

async fn connect_queue(config: &AppConfig) -> Result<Arc<JobQueue>, AppError> {
    let brokers = Brokers::connect(config).await?;
    Ok(Arc::new(JobQueue::from_brokers(brokers, worker_id())))
}

async fn run(
    config: &AppConfig,
    beat: bool,
    queues: Vec<String>,
    concurrency: Option<usize>,
) -> Result<(), AppError> {
    let queue = connect_queue(config).await?;
    let executor = Arc::new(jobs::default_executor());

    let runner = WorkerRunner::new(
        Arc::clone(&queue),
        executor,
        concurrency.unwrap_or(config.worker_concurrency),
        Duration::from_secs(config.worker_poll_interval),
        queue.worker_id(),
    )
    .with_queues(queues);

    let mut scheduler = if beat {
        let scheduler = CronScheduler::new(Arc::clone(&queue)).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        None
    };

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = cancel_tx.send(true);
    });

    runner.run(cancel_rx).await;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}

fn parse_args(args: &str) -> Result<Vec<Value>, AppError> {
    serde_json::from_str(args)
        .map_err(|e| AppError::validation(format!("--args must be a JSON array: {}", e)))
}

fn parse_kwargs(kwargs: &str) -> Result<Map<String, Value>, AppError> {
    serde_json::from_str(kwargs)
        .map_err(|e| AppError::validation(format!("--kwargs must be a JSON object: {}", e)))
}

async fn enqueue(
    config: &AppConfig,
    task: &str,
    args: &str,
    kwargs: &str,
    queue_name: &str,
) -> Result<(), AppError> {
    let executor = jobs::default_executor();
    if !executor.has_handler(task) {
        return Err(AppError::validation(format!(
            "Unknown task '{}'. Registered tasks: {}",
            task,
            executor.registered_types().join(", ")
        )));
    }

    let params = JobCreateParams::new(task)
        .with_args(parse_args(args)?)
        .with_kwargs(parse_kwargs(kwargs)?)
        .on_queue(queue_name);

    let queue = connect_queue(config).await?;
    let job = queue.enqueue(params).await?;

    println!("✓ Task '{}' enqueued on '{}' (id: {})", task, job.queue, job.id);
    Ok(())
}

async fn show_result(config: &AppConfig, job_id: Uuid) -> Result<(), AppError> {
    let queue = connect_queue(config).await?;
    let record = queue
        .result(job_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No result recorded for job {}", job_id)))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn print_schedule() {
    println!("Periodic schedule (UTC):");
    for entry in default_schedule() {
        let args = serde_json::to_string(&entry.args).unwrap_or_else(|_| "[]".to_string());
        println!(
            "  {:<16} {:<22} {:<16} {}",
            entry.name, entry.task, entry.cron, args
        );
    }
}

async fn stats(config: &AppConfig, queues: &[String]) -> Result<(), AppError> {
    let queue = connect_queue(config).await?;
    let queue_refs: Vec<&str> = queues.iter().map(|s| s.as_str()).collect();
    let stats = queue.stats(&queue_refs).await?;

    println!("Worker Queue Status:");
    for (name, pending) in &stats.pending {
        println!("  {:<24} {}", format!("{}:", name), pending);
    }
    Ok(())
}
