//! GitHub code search adapter.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::{check_status, transport_error};
use crate::domain::search::traits::{Result, SourceAdapter};
use crate::domain::search::types::{CodeHostResult, NormalizedQuery, SourceKind, SourceResult};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone)]
pub struct GitHubOptions {
    pub base_url: String,
    /// Bearer token. Unauthenticated code search is heavily rate limited.
    pub token: Option<String>,
    /// Repository searched when the query does not name one.
    pub default_owner: String,
    pub default_repo: String,
    pub limit: usize,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            default_owner: "microsoft".to_string(),
            default_repo: "TypeScript".to_string(),
            limit: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    items: Vec<CodeSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CodeSearchItem {
    name: String,
    path: String,
    html_url: String,
    #[serde(default)]
    score: Option<f64>,
}

pub struct GitHubCodeSearch {
    client: reqwest::Client,
    options: GitHubOptions,
}

impl GitHubCodeSearch {
    pub fn new(client: reqwest::Client, options: GitHubOptions) -> Self {
        Self { client, options }
    }

    fn repository(&self) -> String {
        format!("{}/{}", self.options.default_owner, self.options.default_repo)
    }

    /// Scope the text to the default repository unless it already carries a `repo:` qualifier.
    fn search_terms(&self, query: &NormalizedQuery) -> String {
        if query.text.split_whitespace().any(|t| t.starts_with("repo:")) {
            query.text.clone()
        } else {
            format!("{} repo:{}", query.text, self.repository())
        }
    }
}

#[async_trait]
impl SourceAdapter for GitHubCodeSearch {
    fn kind(&self) -> SourceKind {
        SourceKind::CodeHost
    }

    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>> {
        let url = format!("{}/search/code", self.options.base_url.trim_end_matches('/'));
        let per_page = self.options.limit.to_string();
        let terms = self.search_terms(query);

        let mut request = self
            .client
            .get(url)
            .query(&[("q", terms.as_str()), ("per_page", per_page.as_str())])
            .header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.options.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(transport_error(self.kind()))?;
        let body: CodeSearchResponse = check_status(self.kind(), resp)
            .await?
            .json()
            .await
            .map_err(transport_error(self.kind()))?;

        let repository = self.repository();
        Ok(body
            .items
            .into_iter()
            .take(self.options.limit)
            .map(|item| {
                SourceResult::CodeHost(CodeHostResult {
                    title: item.name,
                    summary: item.path,
                    url: item.html_url,
                    score: item.score,
                    repository: repository.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::source::test_server::{http_client, serve};
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn query(text: &str) -> NormalizedQuery {
        NormalizedQuery {
            text: text.to_string(),
            original: text.to_string(),
            language: "TypeScript".to_string(),
            framework: None,
        }
    }

    fn adapter(base_url: String, token: Option<&str>) -> GitHubCodeSearch {
        GitHubCodeSearch::new(
            http_client(),
            GitHubOptions {
                base_url,
                token: token.map(str::to_string),
                limit: 2,
                ..Default::default()
            },
        )
    }

    #[test]
    fn search_terms_scope_to_default_repo() {
        let github = adapter("http://unused".into(), None);
        assert_eq!(
            github.search_terms(&query("interfaces")),
            "interfaces repo:microsoft/TypeScript"
        );
        assert_eq!(
            github.search_terms(&query("hooks repo:facebook/react")),
            "hooks repo:facebook/react"
        );
    }

    #[tokio::test]
    async fn maps_items_and_sends_auth() {
        let router = Router::new().route(
            "/search/code",
            get(
                |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params["q"], "interfaces repo:microsoft/TypeScript");
                    assert_eq!(params["per_page"], "2");
                    assert_eq!(headers["authorization"], "Bearer secret");
                    assert_eq!(headers["accept"], GITHUB_ACCEPT);
                    Json(json!({
                        "total_count": 3,
                        "items": [
                            { "name": "a.ts", "path": "src/a.ts", "html_url": "https://github.com/a", "score": 1.5 },
                            { "name": "b.ts", "path": "src/b.ts", "html_url": "https://github.com/b" },
                            { "name": "c.ts", "path": "src/c.ts", "html_url": "https://github.com/c", "score": 0.2 }
                        ]
                    }))
                },
            ),
        );
        let github = adapter(serve(router).await, Some("secret"));

        let results = github.fetch(&query("interfaces")).await.unwrap();
        assert_eq!(results.len(), 2);
        match &results[0] {
            SourceResult::CodeHost(r) => {
                assert_eq!(r.title, "a.ts");
                assert_eq!(r.summary, "src/a.ts");
                assert_eq!(r.score, Some(1.5));
                assert_eq!(r.repository, "microsoft/TypeScript");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(results[1].score(), None);
    }

    #[tokio::test]
    async fn auth_and_rate_limit_failures_are_errors() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            let router = Router::new().route("/search/code", get(move || async move { status }));
            let github = adapter(serve(router).await, None);

            assert!(github.fetch(&query("x")).await.is_err());
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let router = Router::new().route(
            "/search/code",
            get(|| async { Json(json!({ "unexpected": true })) }),
        );
        let github = adapter(serve(router).await, None);

        let err = github.fetch(&query("x")).await.unwrap_err();
        assert!(err.to_string().contains("codehost"));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let github = adapter("http://127.0.0.1:9".to_string(), None);
        assert!(github.fetch(&query("x")).await.is_err());
    }
}
