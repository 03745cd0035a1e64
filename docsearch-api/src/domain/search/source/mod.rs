//! Source adapters: one per external documentation source.
//!
//! Each adapter turns a [`NormalizedQuery`] into source-specific requests and maps the
//! response into [`SourceResult`] values. Failures stay inside the adapter boundary.
//!
//! [`NormalizedQuery`]: super::types::NormalizedQuery
//! [`SourceResult`]: super::types::SourceResult

mod github;
mod index;
mod mdn;
#[cfg(test)]
mod mock;
mod readthedocs;

pub use github::{GitHubCodeSearch, GitHubOptions};
pub use index::IndexSearchAdapter;
pub use mdn::{MdnOptions, MdnSearch};
#[cfg(test)]
pub use mock::MockAdapter;
pub use readthedocs::ReadTheDocsSearch;

use reqwest::{Response, StatusCode};

use super::traits::{Result, SearchError};
use super::types::SourceKind;

/// Map non-success statuses to adapter errors. Auth and rate-limit responses are
/// reported like any other failure; nothing is retried.
async fn check_status(kind: SourceKind, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => format!("unauthorized ({})", status),
        StatusCode::TOO_MANY_REQUESTS => "rate limited (429 Too Many Requests)".to_string(),
        _ => format!("unexpected status {}", status),
    };
    Err(SearchError::adapter(kind, message))
}

fn transport_error(kind: SourceKind) -> impl Fn(reqwest::Error) -> SearchError {
    move |e| {
        if e.is_decode() {
            SearchError::adapter(kind, format!("malformed response: {}", e))
        } else {
            SearchError::adapter(kind, e.to_string())
        }
    }
}
