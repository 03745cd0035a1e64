//! Documentation search aggregator.
//!
//! A query is normalized once, then fanned out concurrently to every configured
//! source:
//! - the **documentation index** (Elasticsearch-compatible, full-text)
//! - a **code host** (GitHub code search)
//! - **reference docs** (MDN)
//! - **Read the Docs** project search
//!
//! Results are merged into one ranked page with synthetic, stable ids. A failing or
//! slow source only removes its own contribution.
//!
//! # Architecture
//!
//! - [`SourceAdapter`] - one external source (HTTP adapters, the index adapter, mocks)
//! - [`IndexBackend`] - index operations (Elasticsearch, mocks)
//! - [`HealthProber`] - index liveness, probed per search
//! - [`BestEffortIndexer`] - writes fetched external results back into the index
//!
//! # Example
//!
//! ```ignore
//! use docsearch_api::domain::search::{Aggregator, AggregatorConfig};
//!
//! let aggregator = Aggregator::new(adapters, prober, indexer, AggregatorConfig::default())?;
//! let response = aggregator.search("useEffect", None, None).await?;
//! assert_eq!(response.metadata.expanded_query.as_deref(), Some("React useEffect hook"));
//! ```

mod health;
mod identity;
mod indexer;
mod normalizer;
mod service;
mod traits;
mod types;

pub mod backend;
pub mod source;

pub use health::HealthProber;
pub use indexer::BestEffortIndexer;
pub use service::{Aggregator, AggregatorConfig};
pub use traits::{IndexBackend, SearchError, SourceAdapter};
pub use types::{SearchResponse, SourceHealth};

#[cfg(test)]
pub use types::{CodeHostResult, SourceKind, SourceResult};
