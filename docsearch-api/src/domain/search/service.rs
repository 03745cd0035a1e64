//! Aggregator: fans a query out to every source, merges and ranks the results.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::health::HealthProber;
use super::identity::IdAssigner;
use super::indexer::BestEffortIndexer;
use super::normalizer::normalize;
use super::traits::{Result, SearchError, SourceAdapter};
use super::types::{
    NormalizedQuery, NormalizedResult, SearchMetadata, SearchResponse, SourceHealth, SourceKind,
    SourceResult,
};

/// Configuration for the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Maximum number of results in a response
    pub page_size: usize,
    /// Maximum number of results kept from each source
    pub per_source_limit: usize,
    /// Time each source gets before it is counted as failed
    pub adapter_timeout: Duration,
    /// Bound on the whole search; caps the adapter timeout
    pub overall_timeout: Duration,
    /// Fail the search when the index backend is unhealthy instead of degrading
    pub block_on_index_health: bool,
    /// Write fetched external results back into the index when it is healthy
    pub index_external_results: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            per_source_limit: 10,
            adapter_timeout: Duration::from_secs(8),
            overall_timeout: Duration::from_secs(10),
            block_on_index_health: false,
            index_external_results: true,
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.per_source_limit == 0 {
            return Err(SearchError::Config(
                "per_source_limit must be greater than 0".into(),
            ));
        }
        if self.adapter_timeout.is_zero() || self.overall_timeout.is_zero() {
            return Err(SearchError::Config(
                "timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// What one source contributed to a search.
#[derive(Debug)]
struct SourceOutcome {
    kind: SourceKind,
    results: Vec<SourceResult>,
    failure: Option<String>,
}

/// A response plus the handle of the indexing task it started, if any.
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub indexing: Option<JoinHandle<()>>,
}

/// Fans a query out to all sources and merges the answers into one ranked page.
///
/// # Pipeline
///
/// 1. Normalize the query (the only step that can fail in degrade mode)
/// 2. Probe index health concurrently with every source fetch
/// 3. Bound each fetch by the adapter timeout and the overall deadline
/// 4. Assign synthetic ids and merge in source registration order
/// 5. Stable sort by score, descending
/// 6. Truncate to the page size and describe contributing sources
/// 7. Spawn best-effort indexing when the index is healthy
///
/// # Examples
///
/// ```ignore
/// let aggregator = Aggregator::new(adapters, prober, indexer, AggregatorConfig::default())?;
/// let response = aggregator.search("useEffect", None, None).await?;
/// ```
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    prober: HealthProber,
    indexer: Arc<BestEffortIndexer>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        prober: HealthProber,
        indexer: Arc<BestEffortIndexer>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            adapters,
            prober,
            indexer,
            config,
        })
    }

    /// Probe the index backend on its own, outside any search.
    pub async fn health(&self) -> SourceHealth {
        self.prober.probe().await
    }

    /// Search every source and return the merged page. Indexing, if started, keeps
    /// running after this returns.
    pub async fn search(
        &self,
        query: &str,
        language: Option<&str>,
        framework: Option<&str>,
    ) -> Result<SearchResponse> {
        let SearchOutcome { response, indexing } =
            self.search_detailed(query, language, framework).await?;
        if indexing.is_some() {
            debug!("Indexing continues in the background");
        }
        Ok(response)
    }

    /// Like [`search`](Self::search), also returning the indexing task handle.
    #[instrument(name = "aggregate_search", skip(self))]
    pub async fn search_detailed(
        &self,
        query: &str,
        language: Option<&str>,
        framework: Option<&str>,
    ) -> Result<SearchOutcome> {
        let started = Instant::now();
        let query = normalize(query, language, framework)?;
        let deadline = started + self.config.overall_timeout;

        if query.was_expanded() {
            debug!(original = %query.original, expanded = %query.text, "Query expanded");
        }

        let (health, outcomes) = if self.config.block_on_index_health {
            let health = self.probe_before(deadline).await;
            if !health.is_running {
                warn!(status = %health.status, "Index unhealthy, refusing search");
                return Err(SearchError::IndexUnavailable(
                    health.error.unwrap_or(health.status),
                ));
            }
            let outcomes = self.fan_out(&query, deadline).await;
            (health, outcomes)
        } else {
            tokio::join!(self.probe_before(deadline), self.fan_out(&query, deadline))
        };

        let indexing = if health.is_running && self.config.index_external_results {
            let documents = BestEffortIndexer::documents(
                outcomes.iter().flat_map(|o| o.results.iter()),
                &query,
                OffsetDateTime::now_utc(),
            );
            self.indexer.spawn(documents)
        } else {
            None
        };

        let response = self.assemble(query, &health, outcomes, started.elapsed());
        info!(
            total = response.total,
            returned = response.results.len(),
            took_ms = response.metadata.took,
            index_healthy = health.is_running,
            "Search completed"
        );

        Ok(SearchOutcome { response, indexing })
    }

    async fn probe_before(&self, deadline: Instant) -> SourceHealth {
        tokio::time::timeout_at(deadline, self.prober.probe())
            .await
            .unwrap_or_else(|_| SourceHealth::unreachable("health check exceeded search deadline"))
    }

    async fn fan_out(&self, query: &NormalizedQuery, deadline: Instant) -> Vec<SourceOutcome> {
        let now = Instant::now();
        let adapter_deadline = deadline.min(now + self.config.adapter_timeout);
        let budget = adapter_deadline.saturating_duration_since(now);

        let fetches = self
            .adapters
            .iter()
            .map(|adapter| self.run_adapter(adapter.as_ref(), query, adapter_deadline, budget));

        futures::future::join_all(fetches).await
    }

    /// Run one adapter under its deadline. Errors, timeouts and panics all become an
    /// empty contribution with a recorded reason.
    async fn run_adapter(
        &self,
        adapter: &dyn SourceAdapter,
        query: &NormalizedQuery,
        deadline: Instant,
        budget: Duration,
    ) -> SourceOutcome {
        let kind = adapter.kind();
        let fetch = AssertUnwindSafe(adapter.fetch(query)).catch_unwind();

        let failure = match tokio::time::timeout_at(deadline, fetch).await {
            Ok(Ok(Ok(mut results))) => {
                results.truncate(self.config.per_source_limit);
                debug!(source = %kind, count = results.len(), "Source returned results");
                return SourceOutcome {
                    kind,
                    results,
                    failure: None,
                };
            }
            Ok(Ok(Err(e))) => e.to_string(),
            Ok(Err(_)) => SearchError::Aggregation(format!("{} adapter panicked", kind)).to_string(),
            Err(_) => format!("{} timed out after {}ms", kind, budget.as_millis()),
        };

        warn!(source = %kind, error = %failure, "Source contributed no results");
        SourceOutcome {
            kind,
            results: vec![],
            failure: Some(failure),
        }
    }

    fn assemble(
        &self,
        query: NormalizedQuery,
        health: &SourceHealth,
        outcomes: Vec<SourceOutcome>,
        took: Duration,
    ) -> SearchResponse {
        let mut sources = BTreeMap::from([(SourceKind::Index, false)]);
        let mut failures = Vec::new();
        for outcome in &outcomes {
            let reachable = outcome.kind != SourceKind::Index || health.is_running;
            *sources.entry(outcome.kind).or_insert(false) |= reachable && !outcome.results.is_empty();
            if let Some(failure) = &outcome.failure {
                failures.push(failure.clone());
            }
        }

        let mut results = merge(outcomes);
        let total = results.len();
        results.truncate(self.config.page_size);

        // Nothing to show: say why if any source failed, otherwise it is a real empty match.
        let error = (results.is_empty() && !failures.is_empty()).then(|| failures.join("; "));

        SearchResponse {
            total,
            metadata: SearchMetadata {
                expanded_query: query.was_expanded().then(|| query.text.clone()),
                query: query.original,
                language: query.language,
                framework: query.framework,
                sources,
                error,
                took: Some(millis(took)),
                max_score: results.first().map(|r| r.score),
            },
            results,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Assign ids in fetch order, then sort by score descending. The sort is stable, so
/// equal scores keep source registration order and per-source order.
fn merge(outcomes: Vec<SourceOutcome>) -> Vec<NormalizedResult> {
    let mut ids = IdAssigner::default();
    let mut merged: Vec<NormalizedResult> = outcomes
        .into_iter()
        .flat_map(|outcome| outcome.results)
        .map(|result| {
            let id = ids.assign(&result);
            result.into_normalized(id)
        })
        .collect();

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged
}
