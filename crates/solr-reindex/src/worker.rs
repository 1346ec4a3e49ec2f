//! Partition worker: copies one hash partition of the source collection.

use crate::client::{CollectionClient, Document, PageQuery};
use crate::error::{ReindexError, Result};
use crate::partition::{HashPartition, CURSOR_MARK_START, ROWS_PER_PAGE, VERSION_FIELD};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Terminal state of one partition worker.
///
/// A failed worker has abandoned the remainder of its partition: no
/// retry, no rollback of documents already written. The coordinator
/// records the failure in the run summary but does not treat it as
/// fatal to the run.
#[derive(Debug)]
pub enum WorkerOutcome {
    /// The whole partition was copied and committed.
    Completed { docs_copied: u64, pages: u64 },

    /// The worker stopped early on a query, write, or commit error.
    Failed {
        docs_copied: u64,
        pages: u64,
        error: ReindexError,
    },
}

/// Copies exactly one partition of the source collection, end to end,
/// independently of other workers.
pub struct PartitionWorker {
    partition: HashPartition,
    source: Arc<dyn CollectionClient>,
    dest: Arc<dyn CollectionClient>,
}

impl PartitionWorker {
    /// Create a worker for `partition`, borrowing the shared clients.
    pub fn new(
        partition: HashPartition,
        source: Arc<dyn CollectionClient>,
        dest: Arc<dyn CollectionClient>,
    ) -> Self {
        Self {
            partition,
            source,
            dest,
        }
    }

    /// Run the worker to completion.
    pub async fn run(self) -> WorkerOutcome {
        let worker = self.partition.worker();
        info!(worker, "partition worker starting");

        let mut docs_copied = 0u64;
        let mut pages = 0u64;

        match self.copy_partition(&mut docs_copied, &mut pages).await {
            Ok(()) => {
                info!(worker, docs_copied, pages, "partition worker finished");
                WorkerOutcome::Completed { docs_copied, pages }
            }
            Err(e) => {
                error!(worker, docs_copied, pages, "partition worker failed: {}", e);
                WorkerOutcome::Failed {
                    docs_copied,
                    pages,
                    error: e,
                }
            }
        }
    }

    /// Cursor-paginate this worker's partition and re-submit every
    /// document, then commit once.
    ///
    /// Termination relies on the engine returning a stable cursor mark
    /// once the stream is exhausted; a mark that keeps changing for an
    /// empty delta would loop forever. There is deliberately no
    /// max-iteration cutoff.
    async fn copy_partition(&self, docs_copied: &mut u64, pages: &mut u64) -> Result<()> {
        let mut page = PageQuery {
            query: "*:*".to_string(),
            filter: Some(self.partition.filter_query()),
            partition_keys: Some(self.partition.partition_keys().to_string()),
            sort: self.partition.sort_spec(),
            rows: ROWS_PER_PAGE,
            cursor_mark: CURSOR_MARK_START.to_string(),
        };

        loop {
            let result = self.source.query(&page).await?;
            *pages += 1;

            debug!(
                worker = self.partition.worker(),
                docs = result.docs.len(),
                cursor = %page.cursor_mark,
                "fetched page"
            );

            for doc in result.docs {
                let doc = strip_version(doc);
                self.dest.add(&doc).await?;
                *docs_copied += 1;
            }

            if page.is_final_mark(&result.next_cursor_mark) {
                break;
            }
            page.cursor_mark = result.next_cursor_mark;
        }

        // One commit covering this worker's writes, even for an empty
        // partition.
        self.dest.commit().await
    }
}

/// Drop the engine-assigned version field; the destination assigns its
/// own. A no-op when the field is absent.
pub fn strip_version(mut doc: Document) -> Document {
    doc.remove(VERSION_FIELD);
    doc
}
