//! Reindex coordinator - worker fan-out/join and client lifecycle.

use crate::client::{CollectionClient, HttpCollectionClient};
use crate::config::Config;
use crate::error::Result;
use crate::partition::HashPartition;
use crate::worker::{PartitionWorker, WorkerOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Reindex coordinator.
///
/// Owns the two client handles for the duration of the run; workers
/// only borrow `Arc` clones and never close them.
pub struct Reindexer {
    config: Config,
    source: Arc<dyn CollectionClient>,
    dest: Arc<dyn CollectionClient>,
}

/// A worker that did not complete its partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedWorker {
    /// Zero-based worker index.
    pub worker: usize,

    /// What stopped it.
    pub error: String,
}

/// Result of a reindex run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total workers spawned.
    pub workers_total: usize,

    /// Workers that stopped before finishing their partition.
    pub workers_failed: usize,

    /// Documents copied to the destination across all workers.
    pub docs_copied: u64,

    /// Pages fetched from the source across all workers.
    pub pages_fetched: u64,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Average throughput (docs/second).
    pub docs_per_second: i64,

    /// Details for each failed worker.
    pub failed_workers: Vec<FailedWorker>,
}

impl RunSummary {
    /// Whether every worker copied its whole partition.
    pub fn is_complete(&self) -> bool {
        self.workers_failed == 0
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Reindexer {
    /// Validate the configuration and open both clients.
    ///
    /// An unreachable cluster or missing collection fails here, before
    /// any worker is spawned; this is the only coordinator-level fatal
    /// condition besides invalid configuration.
    pub async fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let source =
            HttpCollectionClient::open(&config.cluster_url, &config.source_collection).await?;
        let dest = HttpCollectionClient::open(&config.cluster_url, &config.dest_collection).await?;

        Ok(Self {
            config,
            source: Arc::new(source),
            dest: Arc::new(dest),
        })
    }

    /// Build a coordinator over caller-supplied clients.
    ///
    /// The configuration is validated before either client is touched.
    pub fn with_clients(
        config: Config,
        source: Arc<dyn CollectionClient>,
        dest: Arc<dyn CollectionClient>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            dest,
        })
    }

    /// Run the reindex: fan out one worker per partition, join all.
    ///
    /// Worker failures are recorded in the summary but are not fatal to
    /// the run; a partially-copied partition still yields `Ok`.
    pub async fn run(self) -> Result<RunSummary> {
        let started_at = Utc::now();
        let workers = self.config.workers;

        info!(
            "Reindexing {} into {} with {} workers",
            self.config.source_collection, self.config.dest_collection, workers
        );

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let partition = HashPartition::new(index, workers)?;
            let worker = PartitionWorker::new(partition, self.source.clone(), self.dest.clone());
            handles.push(tokio::spawn(worker.run()));
        }

        let mut docs_copied = 0u64;
        let mut pages_fetched = 0u64;
        let mut failed_workers = Vec::new();

        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(WorkerOutcome::Completed {
                    docs_copied: docs,
                    pages,
                }) => {
                    docs_copied += docs;
                    pages_fetched += pages;
                }
                Ok(WorkerOutcome::Failed {
                    docs_copied: docs,
                    pages,
                    error,
                }) => {
                    warn!("worker {} abandoned its partition: {}", index, error);
                    docs_copied += docs;
                    pages_fetched += pages;
                    failed_workers.push(FailedWorker {
                        worker: index,
                        error: error.to_string(),
                    });
                }
                Err(e) => {
                    error!("worker {} task panicked: {}", index, e);
                    failed_workers.push(FailedWorker {
                        worker: index,
                        error: format!("task panicked: {}", e),
                    });
                }
            }
        }

        let completed_at = Utc::now();
        let duration = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        let docs_per_second = if duration > 0.0 {
            (docs_copied as f64 / duration) as i64
        } else {
            0
        };

        let summary = RunSummary {
            workers_total: workers,
            workers_failed: failed_workers.len(),
            docs_copied,
            pages_fetched,
            started_at,
            completed_at,
            duration_seconds: duration,
            docs_per_second,
            failed_workers,
        };

        info!(
            "Reindex finished: {} docs in {:.1}s across {} workers ({} failed)",
            summary.docs_copied, summary.duration_seconds, summary.workers_total,
            summary.workers_failed
        );

        Ok(summary)
    }
}
