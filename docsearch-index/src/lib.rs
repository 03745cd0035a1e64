//! Minimal client for an Elasticsearch-compatible index backend: cluster health,
//! search and bulk writes.

mod client;
pub mod domain;
mod index_url;
mod lazy;

pub use client::*;
pub use domain::{ClusterHealth, ClusterStatus, Hit, SearchResponse};
pub use index_url::IndexURL;
pub use lazy::LazyIndexClient;
