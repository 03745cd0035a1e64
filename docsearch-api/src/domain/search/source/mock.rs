//! Mock source adapter for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::search::traits::{Result, SearchError, SourceAdapter};
use crate::domain::search::types::{NormalizedQuery, SourceKind, SourceResult};

#[derive(Clone)]
enum Behavior {
    Return(Vec<SourceResult>),
    Fail(String),
    Panic,
}

/// Adapter returning canned results, an error, or panicking, optionally after a delay.
///
/// # Examples
///
/// ```ignore
/// let github = MockAdapter::returning(SourceKind::CodeHost, vec![result]);
/// let mdn = MockAdapter::failing(SourceKind::ReferenceDocs, "HTTP 503")
///     .with_delay(Duration::from_secs(30));
/// ```
#[derive(Clone)]
pub struct MockAdapter {
    kind: SourceKind,
    behavior: Behavior,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
    queries: Arc<RwLock<Vec<NormalizedQuery>>>,
}

#[allow(dead_code)]
impl MockAdapter {
    fn new(kind: SourceKind, behavior: Behavior) -> Self {
        Self {
            kind,
            behavior,
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(RwLock::new(vec![])),
        }
    }

    pub fn returning(kind: SourceKind, results: Vec<SourceResult>) -> Self {
        Self::new(kind, Behavior::Return(results))
    }

    pub fn failing(kind: SourceKind, error: &str) -> Self {
        Self::new(kind, Behavior::Fail(error.to_string()))
    }

    pub fn panicking(kind: SourceKind) -> Self {
        Self::new(kind, Behavior::Panic)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Queries this adapter was invoked with, in call order.
    pub fn queries(&self) -> Vec<NormalizedQuery> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.queries.write().unwrap().push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Return(results) => Ok(results.clone()),
            Behavior::Fail(e) => Err(SearchError::adapter(self.kind, e.clone())),
            Behavior::Panic => panic!("mock adapter panicked"),
        }
    }
}
