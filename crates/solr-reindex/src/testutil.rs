//! In-memory mock engine for tests.
//!
//! `MockSource` serves a fixture collection with hash-range filtering
//! and cursor-mark pagination over an ascending id sort; `MockSink`
//! records added documents and commits. Both count calls so tests can
//! assert on fetch counts and commit counts.

use crate::client::{CollectionClient, Document, PageQuery, QueryPage};
use crate::error::{ReindexError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a document with an `id` plus extra string fields.
pub(crate) fn doc(id: &str, fields: &[(&str, &str)]) -> Document {
    let mut d = Document::new();
    d.insert("id".to_string(), serde_json::Value::String(id.to_string()));
    for (k, v) in fields {
        d.insert(k.to_string(), serde_json::Value::String(v.to_string()));
    }
    d
}

/// Fixture collection of `n` documents with zero-padded ids (so string
/// sort order matches numeric order) and an engine-assigned version.
pub(crate) fn fixture_docs(n: usize) -> Vec<Document> {
    (1..=n)
        .map(|i| {
            doc(
                &format!("{:04}", i),
                &[("title", "fixture"), ("_version_", "1690000000000000000")],
            )
        })
        .collect()
}

fn fnv1a(s: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.as_bytes() {
        h ^= u64::from(*b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}

/// The mock engine's stable hash partition rule.
pub(crate) fn partition_of(id: &str, workers: usize) -> usize {
    (fnv1a(id) % workers as u64) as usize
}

/// Parse a `{!hash workers=N worker=i}` filter into `(worker, workers)`.
fn parse_hash_filter(fq: &str) -> Option<(usize, usize)> {
    let inner = fq.strip_prefix("{!hash ")?.strip_suffix('}')?;
    let mut workers = None;
    let mut worker = None;
    for part in inner.split_whitespace() {
        if let Some(v) = part.strip_prefix("workers=") {
            workers = v.parse().ok();
        } else if let Some(v) = part.strip_prefix("worker=") {
            worker = v.parse().ok();
        }
    }
    Some((worker?, workers?))
}

/// Read-side mock serving a fixture collection.
pub(crate) struct MockSource {
    collection: String,
    docs: Vec<Document>,
    fetches: AtomicUsize,
    fail_after: Option<usize>,
}

impl MockSource {
    pub(crate) fn new(collection: &str, mut docs: Vec<Document>) -> Self {
        docs.sort_by(|a, b| id_of(a).cmp(id_of(b)));
        Self {
            collection: collection.to_string(),
            docs,
            fetches: AtomicUsize::new(0),
            fail_after: None,
        }
    }

    /// Fail every fetch after the first `n` with a query error.
    pub(crate) fn fail_after_fetches(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn id_of(doc: &Document) -> &str {
    doc.get("id").and_then(|v| v.as_str()).unwrap_or("")
}

#[async_trait]
impl CollectionClient for MockSource {
    async fn query(&self, page: &PageQuery) -> Result<QueryPage> {
        let fetch = self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if fetch >= limit {
                return Err(ReindexError::query(&self.collection, "injected failure"));
            }
        }

        // Cursor pagination is only defined over a stable total order.
        assert_eq!(page.sort, "id asc", "cursor query must sort by id");

        let matching: Vec<&Document> = match page.filter.as_deref() {
            Some(fq) => {
                let (worker, workers) =
                    parse_hash_filter(fq).expect("unrecognized filter query");
                assert_eq!(
                    page.partition_keys.as_deref(),
                    Some("id"),
                    "hash filter must partition on the sort field"
                );
                self.docs
                    .iter()
                    .filter(|d| partition_of(id_of(d), workers) == worker)
                    .collect()
            }
            None => self.docs.iter().collect(),
        };

        let start = if page.cursor_mark == "*" {
            0
        } else {
            matching
                .iter()
                .position(|d| id_of(d) > page.cursor_mark.as_str())
                .unwrap_or(matching.len())
        };
        let slice: Vec<Document> = matching
            .iter()
            .skip(start)
            .take(page.rows)
            .map(|d| (*d).clone())
            .collect();

        // A stable mark once the stream is exhausted; otherwise the id
        // of the last document returned.
        let next_cursor_mark = match slice.last() {
            Some(last) => id_of(last).to_string(),
            None => page.cursor_mark.clone(),
        };

        Ok(QueryPage {
            docs: slice,
            next_cursor_mark,
        })
    }

    async fn add(&self, _doc: &Document) -> Result<()> {
        unreachable!("MockSource is read-only")
    }

    async fn commit(&self) -> Result<()> {
        unreachable!("MockSource is read-only")
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

/// Write-side mock recording adds and commits.
pub(crate) struct MockSink {
    collection: String,
    added: Mutex<Vec<Document>>,
    commits: AtomicUsize,
    fail_writes: bool,
    fail_ids: Vec<String>,
}

impl MockSink {
    pub(crate) fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            added: Mutex::new(Vec::new()),
            commits: AtomicUsize::new(0),
            fail_writes: false,
            fail_ids: Vec::new(),
        }
    }

    /// Fail every add with a write error.
    pub(crate) fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Fail adds for these document ids only.
    pub(crate) fn fail_ids(mut self, ids: Vec<String>) -> Self {
        self.fail_ids = ids;
        self
    }

    pub(crate) fn added(&self) -> Vec<Document> {
        self.added.lock().unwrap().clone()
    }

    pub(crate) fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionClient for MockSink {
    async fn query(&self, _page: &PageQuery) -> Result<QueryPage> {
        unreachable!("MockSink is write-only")
    }

    async fn add(&self, doc: &Document) -> Result<()> {
        if self.fail_writes || self.fail_ids.iter().any(|id| id == id_of(doc)) {
            return Err(ReindexError::write(&self.collection, "injected failure"));
        }
        self.added.lock().unwrap().push(doc.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_filter() {
        assert_eq!(parse_hash_filter("{!hash workers=4 worker=1}"), Some((1, 4)));
        assert_eq!(parse_hash_filter("{!frange l=0}"), None);
    }

    #[test]
    fn test_partition_of_is_total() {
        for i in 0..500 {
            let p = partition_of(&format!("{:04}", i), 4);
            assert!(p < 4);
        }
    }
}
