//! # solr-reindex
//!
//! Parallel collection-to-collection reindexer for SolrCloud-style
//! search clusters.
//!
//! Every document in a source collection is copied to a destination
//! collection by a fixed pool of workers. Each worker owns one disjoint
//! hash partition of the document id space and streams it with cursor
//! pagination over an ascending id sort, so no document is missed or
//! copied twice. Each worker issues a single commit when its partition
//! is exhausted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use solr_reindex::{Config, Reindexer};
//!
//! #[tokio::main]
//! async fn main() -> solr_reindex::Result<()> {
//!     let config = Config {
//!         source_collection: "books".into(),
//!         dest_collection: "books_v2".into(),
//!         cluster_url: "http://localhost:8983/solr".into(),
//!         workers: 4,
//!     };
//!     let summary = Reindexer::connect(config).await?.run().await?;
//!     println!("Copied {} documents", summary.docs_copied);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod partition;
pub mod reindexer;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenient access
pub use client::{CollectionClient, Document, HttpCollectionClient, PageQuery, QueryPage};
pub use config::Config;
pub use error::{ReindexError, Result};
pub use partition::{HashPartition, CURSOR_MARK_START, ID_FIELD, ROWS_PER_PAGE, VERSION_FIELD};
pub use reindexer::{FailedWorker, Reindexer, RunSummary};
pub use worker::{PartitionWorker, WorkerOutcome};
