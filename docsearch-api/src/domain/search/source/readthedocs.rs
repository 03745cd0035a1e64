//! ReadTheDocs search adapter.

use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, transport_error};
use crate::domain::search::traits::{Result, SourceAdapter};
use crate::domain::search::types::{
    NormalizedQuery, ReadTheDocsResult, SourceKind, SourceResult,
};

#[derive(Debug, Deserialize)]
struct RtdSearchResponse {
    results: Vec<RtdPage>,
}

#[derive(Debug, Deserialize)]
struct RtdPage {
    title: String,
    domain: String,
    path: String,
    project: RtdProject,
    #[serde(default)]
    highlights: RtdHighlights,
    #[serde(default)]
    blocks: Vec<RtdBlock>,
}

#[derive(Debug, Deserialize)]
struct RtdProject {
    slug: String,
}

#[derive(Debug, Default, Deserialize)]
struct RtdHighlights {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    content: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RtdBlock {
    #[serde(default)]
    highlights: RtdHighlights,
}

impl RtdPage {
    fn into_result(self) -> SourceResult {
        let url = format!(
            "{}/{}",
            self.domain.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );

        // Section content highlights say more than page title highlights.
        let highlights = self
            .blocks
            .into_iter()
            .flat_map(|block| block.highlights.content)
            .chain(self.highlights.content)
            .chain(self.highlights.title)
            .collect();

        SourceResult::ReadTheDocs(ReadTheDocsResult {
            title: self.title,
            project: self.project.slug,
            url,
            highlights,
        })
    }
}

pub struct ReadTheDocsSearch {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl ReadTheDocsSearch {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            limit,
        }
    }
}

#[async_trait]
impl SourceAdapter for ReadTheDocsSearch {
    fn kind(&self) -> SourceKind {
        SourceKind::ReadTheDocs
    }

    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>> {
        let url = format!("{}/api/v3/search/", self.base_url.trim_end_matches('/'));
        let page_size = self.limit.to_string();

        let resp = self
            .client
            .get(url)
            .query(&[("q", query.text.as_str()), ("page_size", page_size.as_str())])
            .send()
            .await
            .map_err(transport_error(self.kind()))?;

        let body: RtdSearchResponse = check_status(self.kind(), resp)
            .await?
            .json()
            .await
            .map_err(transport_error(self.kind()))?;

        Ok(body
            .results
            .into_iter()
            .take(self.limit)
            .map(RtdPage::into_result)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::source::test_server::{http_client, serve};
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn query(text: &str) -> NormalizedQuery {
        NormalizedQuery {
            text: text.to_string(),
            original: text.to_string(),
            language: "Python".to_string(),
            framework: None,
        }
    }

    #[tokio::test]
    async fn maps_pages_without_scores() {
        let router = Router::new().route(
            "/api/v3/search/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["q"], "sessions");
                assert_eq!(params["page_size"], "5");
                Json(json!({
                    "count": 1,
                    "results": [{
                        "type": "page",
                        "project": { "slug": "requests", "alias": null },
                        "version": { "slug": "latest" },
                        "title": "Advanced Usage",
                        "domain": "https://requests.readthedocs.io",
                        "path": "/en/latest/user/advanced/",
                        "highlights": { "title": [] },
                        "blocks": [{
                            "type": "section",
                            "id": "session-objects",
                            "title": "Session Objects",
                            "content": "The Session object...",
                            "highlights": { "title": [], "content": ["The <span>Session</span> object"] }
                        }]
                    }]
                }))
            }),
        );
        let rtd = ReadTheDocsSearch::new(http_client(), serve(router).await, 5);

        let results = rtd.fetch(&query("sessions")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score(), None);
        assert_eq!(
            results[0].url(),
            Some("https://requests.readthedocs.io/en/latest/user/advanced/")
        );
        match &results[0] {
            SourceResult::ReadTheDocs(page) => {
                assert_eq!(page.project, "requests");
                assert_eq!(page.highlights, vec!["The <span>Session</span> object"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let rtd = ReadTheDocsSearch::new(http_client(), "http://127.0.0.1:9", 5);
        assert!(rtd.fetch(&query("x")).await.is_err());
    }
}
