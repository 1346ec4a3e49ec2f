//! Engine client abstraction.
//!
//! The wire protocol is deliberately opaque to the copy logic: workers
//! only need paged queries against the source and document adds plus a
//! commit against the destination. [`CollectionClient`] is that seam;
//! [`HttpCollectionClient`] is the production implementation speaking
//! the engine's JSON API.

mod http;

pub use http::HttpCollectionClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// A document: ordered field-name to field-value mapping.
///
/// `serde_json` is built with `preserve_order`, so field order survives
/// the round trip from the source to the destination.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// One paged query against a sorted, filtered document stream.
///
/// Each worker owns its own `PageQuery` and only ever advances the
/// cursor mark; pagination state is never shared across workers.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Main query; matches all documents.
    pub query: String,

    /// Filter restricting the result set to one hash partition.
    pub filter: Option<String>,

    /// Field the hash range filter partitions on.
    pub partition_keys: Option<String>,

    /// Sort specification. Cursor pagination is only well-defined over
    /// a stable total order, so this is mandatory.
    pub sort: String,

    /// Page size.
    pub rows: usize,

    /// Opaque cursor mark for this fetch.
    pub cursor_mark: String,
}

/// One page of results plus the cursor mark for the next fetch.
///
/// Pagination is complete when `next_cursor_mark` equals the mark the
/// page was fetched with.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPage {
    /// Documents in this page, in sort order.
    pub docs: Vec<Document>,

    /// Cursor mark to resume from.
    pub next_cursor_mark: String,
}

/// Client bound to a single collection.
///
/// Implementations must be safe to share across workers: every call
/// allocates its own per-call state, so concurrent queries and writes
/// from different workers cannot corrupt each other.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Execute one paged query against the collection.
    async fn query(&self, page: &PageQuery) -> Result<QueryPage>;

    /// Submit a single document to the collection.
    async fn add(&self, doc: &Document) -> Result<()>;

    /// Make previously submitted documents durable and visible.
    async fn commit(&self) -> Result<()>;

    /// Probe that the collection is reachable.
    async fn ping(&self) -> Result<()>;

    /// Name of the bound collection.
    fn collection(&self) -> &str;
}

impl PageQuery {
    /// Whether `returned` signals the end of the stream for this fetch.
    pub fn is_final_mark(&self, returned: &str) -> bool {
        self.cursor_mark == returned
    }
}
