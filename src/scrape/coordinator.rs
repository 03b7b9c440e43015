//! Scrape coordinator - batch orchestration logic
//!
//! This module contains the batch run that coordinates all aspects of the
//! scraping process, including:
//! - Archiving and clearing the previous output
//! - Loading the work list
//! - Feeding a fixed pool of workers through a bounded job queue
//! - Collecting per-item outcomes and run statistics

use crate::config::Config;
use crate::output::{archive_output_dir, log_statistics, RunStatistics};
use crate::scrape::fetcher::build_http_client;
use crate::scrape::worker::{process_item, ItemOutcome};
use crate::worklist::{load_work_list, WorkItem};
use crate::ScrapeError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// A work item paired with its position in the work list
type Job = (usize, WorkItem);

/// Result of a completed batch run
#[derive(Debug)]
pub struct RunReport {
    /// Successfully processed items, annotated with `file_on_disk`, in work-list order
    pub items: Vec<WorkItem>,

    /// Outcome counts for the run
    pub stats: RunStatistics,

    /// Archive written from the previous output, if there was one
    pub archive: Option<PathBuf>,
}

/// Main batch coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
}

impl Coordinator {
    /// Creates a new coordinator for `config`
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Runs the whole batch
    ///
    /// This is the core scraping logic that:
    /// 1. Archives and clears the output directory
    /// 2. Loads the work list
    /// 3. Processes every item on the worker pool
    /// 4. Returns the succeeded items in work-list order
    ///
    /// Archive and work-list failures abort the run. Per-item failures only
    /// remove that item from the report.
    pub async fn run(&self) -> Result<RunReport, ScrapeError> {
        let start_time = Instant::now();

        // Must finish before any worker can touch the output directory
        let archive = archive_output_dir(&self.config.output_dir)?;

        let items = load_work_list(&self.config.work_list)?;
        tracing::info!(
            "Loaded {} work items from {}",
            items.len(),
            self.config.work_list.display()
        );

        let mut outcomes = self.process_all(items).await?;
        outcomes.sort_by_key(|outcome| outcome.index);

        let mut stats = RunStatistics::default();
        let mut succeeded = Vec::new();
        for outcome in outcomes {
            stats.record(outcome.state, outcome.kind);
            if let Some(item) = outcome.item {
                succeeded.push(item);
            }
        }
        stats.elapsed = start_time.elapsed();
        log_statistics(&stats);

        Ok(RunReport {
            items: succeeded,
            stats,
            archive,
        })
    }

    /// Fans `items` out over the worker pool and gathers every outcome
    async fn process_all(&self, items: Vec<WorkItem>) -> Result<Vec<ItemOutcome>, ScrapeError> {
        let worker_count = self.config.scraper.workers.max(1);
        let total = items.len();

        let (job_tx, job_rx) = mpsc::channel::<Job>(worker_count);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<ItemOutcome>(worker_count);

        tracing::info!("Starting {} workers for {} items", worker_count, total);

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            // Built up front so a bad client configuration fails the run
            let client = build_http_client(&self.config.scraper)?;
            let config = Arc::clone(&self.config);
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();

            workers.spawn(async move {
                loop {
                    // Hold the lock only while waiting for the next job
                    let job = job_rx.lock().await.recv().await;
                    let Some((index, item)) = job else {
                        break;
                    };

                    tracing::debug!("Worker {} processing {}", worker_id, item.url());
                    let outcome = process_item(&client, &config.output_dir, index, item).await;
                    if result_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
                tracing::debug!("Worker {} finished", worker_id);
            });
        }
        drop(result_tx);

        let feeder = tokio::spawn(async move {
            for job in items.into_iter().enumerate() {
                if job_tx.send(job).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
            if outcomes.len() % 10 == 0 {
                tracing::info!("Progress: {}/{} items done", outcomes.len(), total);
            }
        }

        feeder
            .await
            .map_err(|e| ScrapeError::Worker(e.to_string()))?;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                // The item that worker was holding is lost, the rest of the batch is not
                tracing::error!("Worker task failed: {}", e);
            }
        }

        if outcomes.len() < total {
            tracing::warn!(
                "{} of {} items produced no outcome",
                total - outcomes.len(),
                total
            );
        }

        Ok(outcomes)
    }
}

/// Runs a complete scrape with `config` and returns the report
pub async fn run_scrape(config: Config) -> Result<RunReport, ScrapeError> {
    Coordinator::new(config).run().await
}
