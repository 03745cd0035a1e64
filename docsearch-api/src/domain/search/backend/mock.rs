//! Mock index backend for testing.

use async_trait::async_trait;
use docsearch_index::{ClusterHealth, ClusterStatus};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::search::traits::{IndexBackend, Result, SearchError};
use crate::domain::search::types::{ExternalDocument, IndexHit};

/// In-memory index backend with configurable health and canned hits.
///
/// Clones share state, so a test can keep one handle for assertions after moving
/// another into the code under test.
#[derive(Clone)]
pub struct MockIndexBackend {
    status: std::result::Result<ClusterStatus, String>,
    health_delay: Option<Duration>,
    hits: Arc<Vec<IndexHit>>,
    search_error: Option<String>,
    bulk_error: Option<String>,
    search_bodies: Arc<RwLock<Vec<(String, Value)>>>,
    written: Arc<RwLock<Vec<(String, ExternalDocument)>>>,
    health_calls: Arc<AtomicUsize>,
    bulk_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockIndexBackend {
    pub fn with_status(status: ClusterStatus) -> Self {
        Self {
            status: Ok(status),
            health_delay: None,
            hits: Arc::new(vec![]),
            search_error: None,
            bulk_error: None,
            search_bodies: Arc::default(),
            written: Arc::default(),
            health_calls: Arc::default(),
            bulk_calls: Arc::default(),
        }
    }

    pub fn healthy() -> Self {
        Self::with_status(ClusterStatus::Green)
    }

    pub fn unreachable(error: &str) -> Self {
        Self {
            status: Err(error.to_string()),
            ..Self::healthy()
        }
    }

    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    pub fn with_hits(mut self, hits: Vec<IndexHit>) -> Self {
        self.hits = Arc::new(hits);
        self
    }

    pub fn failing_search(mut self, error: &str) -> Self {
        self.search_error = Some(error.to_string());
        self
    }

    pub fn failing_bulk(mut self, error: &str) -> Self {
        self.bulk_error = Some(error.to_string());
        self
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    /// Documents written through `bulk`, with the index they were written to.
    pub fn written(&self) -> Vec<(String, ExternalDocument)> {
        self.written.read().unwrap().clone()
    }

    pub fn search_bodies(&self) -> Vec<(String, Value)> {
        self.search_bodies.read().unwrap().clone()
    }
}

#[async_trait]
impl IndexBackend for MockIndexBackend {
    async fn health(&self) -> Result<ClusterHealth> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.health_delay {
            tokio::time::sleep(delay).await;
        }

        match &self.status {
            Ok(status) => Ok(ClusterHealth {
                status: *status,
                cluster_name: Some("mock".to_string()),
                number_of_nodes: Some(1),
                active_shards: Some(1),
            }),
            Err(e) => Err(SearchError::Backend(e.clone())),
        }
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<IndexHit>> {
        self.search_bodies
            .write()
            .unwrap()
            .push((index.to_string(), body.clone()));

        match &self.search_error {
            Some(e) => Err(SearchError::Backend(e.clone())),
            None => Ok(self.hits.as_ref().clone()),
        }
    }

    async fn bulk(&self, index: &str, docs: &[ExternalDocument]) -> Result<usize> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.bulk_error {
            return Err(SearchError::Backend(e.clone()));
        }

        let mut written = self.written.write().unwrap();
        written.extend(docs.iter().map(|doc| (index.to_string(), doc.clone())));
        Ok(docs.len())
    }
}
