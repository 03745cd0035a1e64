use std::sync::Arc;

use docsearch_index::LazyIndexClient;

use crate::{
    config::Settings,
    domain::search::{
        backend::ElasticBackend,
        source::{GitHubCodeSearch, IndexSearchAdapter, MdnSearch, ReadTheDocsSearch},
        Aggregator, BestEffortIndexer, HealthProber, IndexBackend, SearchError, SourceAdapter,
    },
};

const USER_AGENT: &str = concat!("docsearch-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }

    /// Wire every enabled source from settings. The index client is created lazily, so
    /// start-up succeeds even when the index backend is down.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppStateError> {
        let config = settings.search.aggregator_config();
        let limit = config.per_source_limit;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.adapter_timeout)
            .build()?;

        let index_client = Arc::new(LazyIndexClient::new(settings.index.client_options()));
        let backend: Arc<dyn IndexBackend> = Arc::new(ElasticBackend::new(index_client));

        let mut adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(IndexSearchAdapter::new(
            backend.clone(),
            settings.index.search_index.clone(),
            limit,
        ))];

        let sources = &settings.sources;
        if sources.github.enabled {
            adapters.push(Arc::new(GitHubCodeSearch::new(
                http.clone(),
                sources.github.options(limit),
            )));
        }
        if sources.mdn.enabled {
            adapters.push(Arc::new(MdnSearch::new(http.clone(), sources.mdn.options(limit))));
        }
        if sources.readthedocs.enabled {
            adapters.push(Arc::new(ReadTheDocsSearch::new(
                http,
                sources.readthedocs.base_url.clone(),
                limit,
            )));
        }

        tracing::info!(
            sources = ?adapters.iter().map(|a| a.kind().as_str()).collect::<Vec<_>>(),
            "Search sources configured"
        );

        let prober = HealthProber::new(backend.clone(), settings.index.health_timeout());
        let indexer = Arc::new(BestEffortIndexer::new(
            backend,
            settings.index.external_index.clone(),
        ));

        Ok(Self::new(Aggregator::new(adapters, prober, indexer, config)?))
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}
