//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use async_trait::async_trait;
use docsearch_index::ClusterHealth;
use serde_json::Value;

use super::types::{ExternalDocument, IndexHit, NormalizedQuery, SourceKind, SourceResult};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} fetch failed: {message}")]
    Adapter { kind: SourceKind, message: String },

    #[error("Index backend unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Index backend error: {0}")]
    Backend(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    pub fn adapter(kind: SourceKind, message: impl Into<String>) -> Self {
        SearchError::Adapter {
            kind,
            message: message.into(),
        }
    }
}

impl From<docsearch_index::IndexClientError> for SearchError {
    fn from(e: docsearch_index::IndexClientError) -> Self {
        SearchError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// One external documentation source.
///
/// Failures are reported as errors here; the aggregator logs them and counts the
/// source as an empty contribution, so they never reach the caller of a search.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter talks to.
    fn kind(&self) -> SourceKind;

    /// Query the source. Network, auth, rate-limit and decoding failures are errors.
    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>>;
}

/// Operations the search domain needs from the index backend.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    async fn health(&self) -> Result<ClusterHealth>;

    /// Run a query DSL body against `index`.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<IndexHit>>;

    /// Write documents with a single bulk request, returning how many were acknowledged.
    async fn bulk(&self, index: &str, docs: &[ExternalDocument]) -> Result<usize>;
}
