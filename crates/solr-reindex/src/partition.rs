//! Deterministic hash partitioning of the document space.
//!
//! The split itself is computed server side by the engine's hash range
//! query parser; this module only builds the filter expression for one
//! `(worker, workers)` pair. Disjointness and exhaustiveness across
//! workers follow from the engine hashing the same id field the cursor
//! stream is sorted on.

use crate::error::{ReindexError, Result};

/// Documents fetched per page. Fixed; bounds per-request memory only.
pub const ROWS_PER_PAGE: usize = 50;

/// Unique-identifier field of every document.
pub const ID_FIELD: &str = "id";

/// Engine-assigned revision field, stripped before re-submission.
pub const VERSION_FIELD: &str = "_version_";

/// Cursor sentinel for the beginning of a partition stream.
pub const CURSOR_MARK_START: &str = "*";

/// One worker's share of the document space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashPartition {
    worker: usize,
    workers: usize,
}

impl HashPartition {
    /// Create a partition for `worker` out of `workers` total.
    pub fn new(worker: usize, workers: usize) -> Result<Self> {
        if workers < 1 {
            return Err(ReindexError::Config("workers must be at least 1".into()));
        }
        if worker >= workers {
            return Err(ReindexError::Config(format!(
                "worker index {} out of range for {} workers",
                worker, workers
            )));
        }
        Ok(Self { worker, workers })
    }

    /// Zero-based index of this worker.
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Total number of workers in the run.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Filter query restricting results to this partition's hash range.
    pub fn filter_query(&self) -> String {
        format!("{{!hash workers={} worker={}}}", self.workers, self.worker)
    }

    /// Field the hash range parser partitions on. Must match the sort
    /// field so every document is visited exactly once.
    pub fn partition_keys(&self) -> &'static str {
        ID_FIELD
    }

    /// Sort specification required for cursor pagination.
    pub fn sort_spec(&self) -> String {
        format!("{} asc", ID_FIELD)
    }
}
