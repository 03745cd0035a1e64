use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    domain::{bulk_body, BulkResponse, ClusterHealth, SearchResponse},
    IndexURL,
};

/// Connection options for the index backend.
#[derive(Debug, Clone)]
pub struct IndexClientOptions {
    pub url: String,
    pub request_timeout: Duration,
}

impl Default for IndexClientOptions {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Stateless handle to an Elasticsearch-compatible index backend.
///
/// Cloning is cheap and the handle is safe to share between concurrent requests;
/// the backend enforces its own consistency.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: reqwest::Client,
    base_url: IndexURL,
}

impl IndexClient {
    pub fn new(options: IndexClientOptions) -> Result<Self, IndexClientError> {
        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| IndexClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: IndexURL::new(options.url),
        })
    }

    pub fn base_url(&self) -> &IndexURL {
        &self.base_url
    }

    pub async fn health(&self) -> Result<ClusterHealth, IndexClientError> {
        let url = self.base_url.append_path("/_cluster/health");
        let resp = self
            .http
            .get(url.as_ref())
            .send()
            .await
            .map_err(|e| IndexClientError::ResponseError(e.to_string()))?;

        parse_json(check_status(resp).await?).await
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<SearchResponse<T>, IndexClientError> {
        let url = self.base_url.append_path(&format!("/{}/_search", index));
        let resp = self
            .http
            .post(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| IndexClientError::ResponseError(e.to_string()))?;

        parse_json(check_status(resp).await?).await
    }

    /// Write `docs` into `index` with a single bulk request.
    ///
    /// Returns the number of acknowledged items. Item-level failures reported by the
    /// backend surface as [`IndexClientError::PartialBulkFailure`].
    pub async fn bulk<T: Serialize>(
        &self,
        index: &str,
        docs: &[T],
    ) -> Result<usize, IndexClientError> {
        if docs.is_empty() {
            return Ok(0);
        }

        let body = bulk_body(index, docs)?;
        let url = self.base_url.append_path("/_bulk");
        let resp = self
            .http
            .post(url.as_ref())
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| IndexClientError::ResponseError(e.to_string()))?;

        let result: BulkResponse = parse_json(check_status(resp).await?).await?;
        debug!(index, items = result.item_count(), "Bulk request acknowledged");

        if result.errors {
            return Err(IndexClientError::PartialBulkFailure(result.item_count()));
        }

        Ok(result.item_count())
    }
}

async fn check_status(resp: Response) -> Result<Response, IndexClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IndexClientError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(IndexClientError::RateLimited),
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(IndexClientError::Status(status.as_u16(), body))
        }
    }
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, IndexClientError> {
    resp.json::<T>().await.map_err(|e| {
        IndexClientError::ParsingError(format!("Failed to parse response as JSON: {}", e))
    })
}

#[derive(Error, Debug)]
pub enum IndexClientError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Rate limited")]
    RateLimited,
    #[error("Unexpected status {0}: {1}")]
    Status(u16, String),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Bulk request reported failures across {0} items")]
    PartialBulkFailure(usize),
    #[error("Failed to build client: {0}")]
    Build(String),
}
