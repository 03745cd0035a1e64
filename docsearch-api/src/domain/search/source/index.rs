//! Indexed-search adapter: queries the full-text index directly.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::search::traits::{IndexBackend, Result, SearchError, SourceAdapter};
use crate::domain::search::types::{NormalizedQuery, SourceKind, SourceResult};

pub struct IndexSearchAdapter {
    backend: Arc<dyn IndexBackend>,
    index: String,
    limit: usize,
}

impl IndexSearchAdapter {
    pub fn new(backend: Arc<dyn IndexBackend>, index: impl Into<String>, limit: usize) -> Self {
        Self {
            backend,
            index: index.into(),
            limit,
        }
    }

    /// Fuzzy multi-field match weighted towards titles, filtered by language and,
    /// when present, framework.
    fn query_body(&self, query: &NormalizedQuery) -> Value {
        let mut filters = vec![json!({ "term": { "language": query.language } })];
        if let Some(framework) = &query.framework {
            filters.push(json!({ "term": { "framework": framework } }));
        }

        json!({
            "query": {
                "bool": {
                    "must": {
                        "multi_match": {
                            "query": query.text,
                            "fields": ["title^2", "content"],
                            "fuzziness": "AUTO",
                            "minimum_should_match": "70%"
                        }
                    },
                    "filter": filters
                }
            },
            "highlight": {
                "fields": {
                    "title": {},
                    "content": { "fragment_size": 150, "number_of_fragments": 3 }
                }
            },
            "_source": ["title", "content", "summary", "url", "language", "framework"],
            "size": self.limit
        })
    }
}

#[async_trait]
impl SourceAdapter for IndexSearchAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Index
    }

    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>> {
        let hits = self
            .backend
            .search(&self.index, &self.query_body(query))
            .await
            .map_err(|e| SearchError::adapter(self.kind(), e.to_string()))?;

        Ok(hits
            .into_iter()
            .take(self.limit)
            .map(SourceResult::Index)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::backend::MockIndexBackend;
    use crate::domain::search::types::{Highlights, IndexHit};

    fn query(framework: Option<&str>) -> NormalizedQuery {
        NormalizedQuery {
            text: "React useEffect hook".to_string(),
            original: "useEffect".to_string(),
            language: "JavaScript".to_string(),
            framework: framework.map(str::to_string),
        }
    }

    fn hit(id: &str, score: f64) -> IndexHit {
        IndexHit {
            doc_id: id.to_string(),
            title: format!("Doc {}", id),
            content: "content".to_string(),
            url: None,
            language: Some("JavaScript".to_string()),
            framework: Some("React".to_string()),
            score: Some(score),
            highlights: Highlights::default(),
        }
    }

    #[tokio::test]
    async fn sends_filtered_multi_match_to_configured_index() {
        let backend = MockIndexBackend::healthy().with_hits(vec![hit("1", 2.0)]);
        let adapter = IndexSearchAdapter::new(Arc::new(backend.clone()), "documentation", 10);

        let results = adapter.fetch(&query(Some("React"))).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind(), SourceKind::Index);

        let bodies = backend.search_bodies();
        let (index, body) = &bodies[0];
        assert_eq!(index, "documentation");
        assert_eq!(
            body["query"]["bool"]["must"]["multi_match"]["query"],
            "React useEffect hook"
        );
        assert_eq!(body["query"]["bool"]["filter"].as_array().unwrap().len(), 2);
        assert_eq!(body["query"]["bool"]["filter"][1]["term"]["framework"], "React");
        assert_eq!(body["size"], 10);
    }

    #[tokio::test]
    async fn framework_filter_omitted_when_unset() {
        let backend = MockIndexBackend::healthy();
        let adapter = IndexSearchAdapter::new(Arc::new(backend.clone()), "documentation", 10);

        adapter.fetch(&query(None)).await.unwrap();
        let bodies = backend.search_bodies();
        let filters = bodies[0].1["query"]["bool"]["filter"].as_array().unwrap().clone();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0]["term"]["language"], "JavaScript");
    }

    #[tokio::test]
    async fn results_capped_at_limit() {
        let hits = (0..5).map(|i| hit(&i.to_string(), 1.0)).collect();
        let backend = MockIndexBackend::healthy().with_hits(hits);
        let adapter = IndexSearchAdapter::new(Arc::new(backend), "documentation", 3);

        assert_eq!(adapter.fetch(&query(None)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn backend_failure_is_an_error() {
        let backend = MockIndexBackend::healthy().failing_search("index_not_found_exception");
        let adapter = IndexSearchAdapter::new(Arc::new(backend), "documentation", 10);

        let err = adapter.fetch(&query(None)).await.unwrap_err();
        assert!(err.to_string().starts_with("index fetch failed"));
    }
}
