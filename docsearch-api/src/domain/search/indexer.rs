//! Best-effort write-back of externally fetched results into the index.
//!
//! Indexing runs as a detached task after the response has been assembled. Its
//! failures are logged on the `dead_letter` target and never reach the caller.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::traits::IndexBackend;
use super::types::{ExternalDocument, NormalizedQuery, SourceKind, SourceResult};

/// Writes fetched results into the external-documents index.
pub struct BestEffortIndexer {
    backend: Arc<dyn IndexBackend>,
    index: String,
}

impl BestEffortIndexer {
    pub fn new(backend: Arc<dyn IndexBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }

    /// Build bulk documents for every result that did not come from the index itself.
    pub fn documents<'a>(
        results: impl IntoIterator<Item = &'a SourceResult>,
        query: &NormalizedQuery,
        timestamp: OffsetDateTime,
    ) -> Vec<ExternalDocument> {
        results
            .into_iter()
            .filter(|result| result.kind() != SourceKind::Index)
            .map(|result| ExternalDocument {
                title: result.title().to_string(),
                summary: result.summary().map(str::to_string),
                url: result.url().map(str::to_string),
                score: result.score(),
                source: result.kind(),
                language: query.language.clone(),
                framework: query.framework.clone(),
                timestamp,
                doc_type: "external",
            })
            .collect()
    }

    /// Write `documents` with one bulk request. Returns how many were written; errors
    /// are logged and reported as zero.
    pub async fn index(&self, documents: &[ExternalDocument]) -> usize {
        if documents.is_empty() {
            return 0;
        }

        match self.backend.bulk(&self.index, documents).await {
            Ok(written) => {
                info!(index = %self.index, written, "Indexed external results");
                written
            }
            Err(e) => {
                error!(
                    target: "dead_letter",
                    index = %self.index,
                    documents = documents.len(),
                    error = %e,
                    "Failed to index external results"
                );
                0
            }
        }
    }

    /// Index in a detached task. The caller may drop the handle; nothing waits on it.
    pub fn spawn(self: &Arc<Self>, documents: Vec<ExternalDocument>) -> Option<JoinHandle<()>> {
        if documents.is_empty() {
            return None;
        }

        let indexer = Arc::clone(self);
        Some(tokio::spawn(async move {
            indexer.index(&documents).await;
        }))
    }
}
