//! Error types for the reindex library.

use thiserror::Error;

/// Main error type for reindex operations.
#[derive(Error, Debug)]
pub enum ReindexError {
    /// Configuration error (missing argument, worker count < 1, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cluster unreachable or collection missing at client construction
    #[error("Connection error for {url}: {message}")]
    Connection { url: String, message: String },

    /// Query against the source collection failed
    #[error("Query failed on collection {collection}: {message}")]
    Query { collection: String, message: String },

    /// Document submission to the destination collection failed
    #[error("Write failed on collection {collection}: {message}")]
    Write { collection: String, message: String },

    /// Commit on the destination collection failed
    #[error("Commit failed on collection {collection}: {message}")]
    Commit { collection: String, message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReindexError {
    /// Create a Connection error.
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        ReindexError::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a Query error.
    pub fn query(collection: impl Into<String>, message: impl Into<String>) -> Self {
        ReindexError::Query {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create a Write error.
    pub fn write(collection: impl Into<String>, message: impl Into<String>) -> Self {
        ReindexError::Write {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create a Commit error.
    pub fn commit(collection: impl Into<String>, message: impl Into<String>) -> Self {
        ReindexError::Commit {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Configuration problems exit with 1, connection problems with 2,
    /// everything observed during the copy itself with 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReindexError::Config(_) => 1,
            ReindexError::Connection { .. } => 2,
            _ => 3,
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for reindex operations.
pub type Result<T> = std::result::Result<T, ReindexError>;
