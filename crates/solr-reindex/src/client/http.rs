//! HTTP implementation of [`CollectionClient`] for the engine's JSON API.

use super::{CollectionClient, Document, PageQuery, QueryPage};
use crate::error::{ReindexError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Client for one collection over the engine's HTTP JSON API.
///
/// The underlying `reqwest::Client` holds a shared connection pool and
/// is safe for concurrent use; each request carries its own state.
pub struct HttpCollectionClient {
    http: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Deserialize)]
struct SelectResponse {
    response: SelectBody,
    #[serde(rename = "nextCursorMark")]
    next_cursor_mark: String,
}

#[derive(Deserialize)]
struct SelectBody {
    docs: Vec<Document>,
}

#[derive(Deserialize)]
struct UpdateResponse {
    #[serde(rename = "responseHeader")]
    response_header: ResponseHeader,
}

#[derive(Deserialize)]
struct ResponseHeader {
    status: i32,
}

impl HttpCollectionClient {
    /// Create a client bound to `collection` without probing it.
    pub fn new(cluster_url: &str, collection: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cluster_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    /// Create a client and verify the collection is reachable.
    ///
    /// An unreachable cluster or missing collection surfaces here, before
    /// any worker is spawned.
    pub async fn open(cluster_url: &str, collection: &str) -> Result<Self> {
        let client = Self::new(cluster_url, collection);
        client.ping().await?;
        Ok(client)
    }

    fn collection_url(&self, handler: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, handler)
    }
}

#[async_trait]
impl CollectionClient for HttpCollectionClient {
    async fn query(&self, page: &PageQuery) -> Result<QueryPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", page.query.clone()),
            ("sort", page.sort.clone()),
            ("rows", page.rows.to_string()),
            ("cursorMark", page.cursor_mark.clone()),
            ("wt", "json".to_string()),
        ];
        if let Some(ref fq) = page.filter {
            params.push(("fq", fq.clone()));
        }
        if let Some(ref keys) = page.partition_keys {
            params.push(("partitionKeys", keys.clone()));
        }

        debug!(
            collection = %self.collection,
            cursor = %page.cursor_mark,
            "fetching page"
        );

        let rsp: SelectResponse = self
            .http
            .get(self.collection_url("select"))
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReindexError::query(&self.collection, e.to_string()))?
            .json()
            .await
            .map_err(|e| ReindexError::query(&self.collection, e.to_string()))?;

        Ok(QueryPage {
            docs: rsp.response.docs,
            next_cursor_mark: rsp.next_cursor_mark,
        })
    }

    async fn add(&self, doc: &Document) -> Result<()> {
        let rsp: UpdateResponse = self
            .http
            .post(self.collection_url("update"))
            .json(std::slice::from_ref(doc))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReindexError::write(&self.collection, e.to_string()))?
            .json()
            .await
            .map_err(|e| ReindexError::write(&self.collection, e.to_string()))?;

        if rsp.response_header.status != 0 {
            return Err(ReindexError::write(
                &self.collection,
                format!("update returned status {}", rsp.response_header.status),
            ));
        }
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let rsp: UpdateResponse = self
            .http
            .post(self.collection_url("update"))
            .query(&[("commit", "true")])
            .json(&serde_json::json!({}))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReindexError::commit(&self.collection, e.to_string()))?
            .json()
            .await
            .map_err(|e| ReindexError::commit(&self.collection, e.to_string()))?;

        if rsp.response_header.status != 0 {
            return Err(ReindexError::commit(
                &self.collection,
                format!("commit returned status {}", rsp.response_header.status),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.http
            .get(self.collection_url("admin/ping"))
            .query(&[("wt", "json")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                ReindexError::connection(
                    format!("{}/{}", self.base_url, self.collection),
                    e.to_string(),
                )
            })?;
        Ok(())
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
