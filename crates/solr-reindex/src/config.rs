//! Run configuration and validation.

use crate::error::{ReindexError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a reindex run. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the source collection (read side).
    pub source_collection: String,

    /// Name of the destination collection (write side).
    pub dest_collection: String,

    /// Base URL of the cluster, e.g. `http://localhost:8983/solr`.
    pub cluster_url: String,

    /// Total number of parallel partition workers.
    pub workers: usize,
}

impl Config {
    /// Validate the configuration.
    ///
    /// Runs before any client is constructed, so an invalid configuration
    /// never causes network activity.
    pub fn validate(&self) -> Result<()> {
        if self.source_collection.is_empty() {
            return Err(ReindexError::Config("source collection is required".into()));
        }
        if self.dest_collection.is_empty() {
            return Err(ReindexError::Config(
                "destination collection is required".into(),
            ));
        }
        if self.cluster_url.is_empty() {
            return Err(ReindexError::Config("cluster URL is required".into()));
        }
        if self.source_collection == self.dest_collection {
            return Err(ReindexError::Config(
                "source and destination cannot be the same collection".into(),
            ));
        }
        if self.workers < 1 {
            return Err(ReindexError::Config("workers must be at least 1".into()));
        }
        Ok(())
    }
}
