//! MDN Web Docs search adapter.

use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, transport_error};
use crate::domain::search::traits::{Result, SourceAdapter};
use crate::domain::search::types::{
    NormalizedQuery, ReferenceDocResult, SourceKind, SourceResult,
};

#[derive(Debug, Clone)]
pub struct MdnOptions {
    pub base_url: String,
    pub locale: String,
    pub limit: usize,
}

impl Default for MdnOptions {
    fn default() -> Self {
        Self {
            base_url: "https://developer.mozilla.org".to_string(),
            locale: "en-US".to_string(),
            limit: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MdnSearchResponse {
    documents: Vec<MdnDocument>,
}

#[derive(Debug, Deserialize)]
struct MdnDocument {
    mdn_url: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    highlight: MdnHighlight,
}

#[derive(Debug, Default, Deserialize)]
struct MdnHighlight {
    #[serde(default)]
    body: Vec<String>,
}

pub struct MdnSearch {
    client: reqwest::Client,
    options: MdnOptions,
}

impl MdnSearch {
    pub fn new(client: reqwest::Client, options: MdnOptions) -> Self {
        Self { client, options }
    }

    /// MDN returns site-relative paths such as `/en-US/docs/Web/API/fetch`.
    fn absolute_url(&self, mdn_url: &str) -> String {
        if mdn_url.starts_with("http://") || mdn_url.starts_with("https://") {
            return mdn_url.to_string();
        }
        format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            mdn_url.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl SourceAdapter for MdnSearch {
    fn kind(&self) -> SourceKind {
        SourceKind::ReferenceDocs
    }

    async fn fetch(&self, query: &NormalizedQuery) -> Result<Vec<SourceResult>> {
        let url = format!("{}/api/v1/search", self.options.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .get(url)
            .query(&[
                ("q", query.text.as_str()),
                ("locale", self.options.locale.as_str()),
                ("highlight", "true"),
            ])
            .send()
            .await
            .map_err(transport_error(self.kind()))?;

        let body: MdnSearchResponse = check_status(self.kind(), resp)
            .await?
            .json()
            .await
            .map_err(transport_error(self.kind()))?;

        Ok(body
            .documents
            .into_iter()
            .take(self.options.limit)
            .map(|doc| {
                SourceResult::ReferenceDocs(ReferenceDocResult {
                    url: self.absolute_url(&doc.mdn_url),
                    title: doc.title,
                    summary: doc.summary,
                    score: doc.score,
                    highlights: doc.highlight.body,
                })
            })
            .collect())
    }
}
