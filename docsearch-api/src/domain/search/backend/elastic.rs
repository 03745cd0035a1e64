//! [`IndexBackend`] over the shared, lazily-initialized index client.

use std::sync::Arc;

use async_trait::async_trait;
use docsearch_index::{ClusterHealth, Hit, LazyIndexClient};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::search::traits::{IndexBackend, Result};
use crate::domain::search::types::{ExternalDocument, Highlights, IndexHit};

/// Stored shape of a document in the documentation index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexedDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Externally fetched documents carry `summary` instead of `content`.
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
}

impl From<Hit<IndexedDocument>> for IndexHit {
    fn from(mut hit: Hit<IndexedDocument>) -> Self {
        let highlights = Highlights {
            title: hit.highlight.remove("title").unwrap_or_default(),
            content: hit.highlight.remove("content").unwrap_or_default(),
        };
        let doc = hit.source;

        IndexHit {
            doc_id: hit.id,
            title: doc.title,
            content: doc.content.or(doc.summary).unwrap_or_default(),
            url: doc.url,
            language: doc.language,
            framework: doc.framework,
            score: hit.score,
            highlights,
        }
    }
}

/// Index backend speaking the Elasticsearch REST dialect.
#[derive(Clone)]
pub struct ElasticBackend {
    client: Arc<LazyIndexClient>,
}

impl ElasticBackend {
    pub fn new(client: Arc<LazyIndexClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IndexBackend for ElasticBackend {
    async fn health(&self) -> Result<ClusterHealth> {
        Ok(self.client.get().await?.health().await?)
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<IndexHit>> {
        let response = self
            .client
            .get()
            .await?
            .search::<IndexedDocument>(index, body)
            .await?;

        Ok(response.into_hits().into_iter().map(IndexHit::from).collect())
    }

    async fn bulk(&self, index: &str, docs: &[ExternalDocument]) -> Result<usize> {
        Ok(self.client.get().await?.bulk(index, docs).await?)
    }
}
