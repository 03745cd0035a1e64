//! Core types for the search domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a result came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The full-text index backend.
    Index,
    /// GitHub code search.
    CodeHost,
    /// MDN Web Docs.
    ReferenceDocs,
    /// ReadTheDocs hosted documentation.
    ReadTheDocs,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Index => "index",
            SourceKind::CodeHost => "codehost",
            SourceKind::ReferenceDocs => "referencedocs",
            SourceKind::ReadTheDocs => "readthedocs",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query after validation and rewriting, ready to be dispatched to every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Text sent to the sources (possibly expanded)
    pub text: String,
    /// Trimmed text as the user typed it
    pub original: String,
    pub language: String,
    pub framework: Option<String>,
}

impl NormalizedQuery {
    pub fn was_expanded(&self) -> bool {
        self.text != self.original
    }
}

/// Highlighted fragments returned by sources that support highlighting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlights {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }

    fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Hit from the full-text index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexHit {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub score: Option<f64>,
    pub highlights: Highlights,
}

/// File match from GitHub code search.
#[derive(Debug, Clone, Serialize)]
pub struct CodeHostResult {
    /// File name
    pub title: String,
    /// Path inside the repository
    pub summary: String,
    pub url: String,
    pub score: Option<f64>,
    /// "owner/repo"
    pub repository: String,
}

/// Document from MDN search.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceDocResult {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub score: Option<f64>,
    pub highlights: Vec<String>,
}

/// Page from ReadTheDocs search. ReadTheDocs exposes no ranking signal.
#[derive(Debug, Clone, Serialize)]
pub struct ReadTheDocsResult {
    pub title: String,
    pub project: String,
    pub url: String,
    pub highlights: Vec<String>,
}

/// A raw result as produced by one source adapter.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceResult {
    Index(IndexHit),
    CodeHost(CodeHostResult),
    ReferenceDocs(ReferenceDocResult),
    ReadTheDocs(ReadTheDocsResult),
}

impl SourceResult {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceResult::Index(_) => SourceKind::Index,
            SourceResult::CodeHost(_) => SourceKind::CodeHost,
            SourceResult::ReferenceDocs(_) => SourceKind::ReferenceDocs,
            SourceResult::ReadTheDocs(_) => SourceKind::ReadTheDocs,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SourceResult::Index(hit) => &hit.title,
            SourceResult::CodeHost(r) => &r.title,
            SourceResult::ReferenceDocs(r) => &r.title,
            SourceResult::ReadTheDocs(r) => &r.title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            SourceResult::Index(hit) => hit.url.as_deref(),
            SourceResult::CodeHost(r) => Some(r.url.as_str()),
            SourceResult::ReferenceDocs(r) => Some(r.url.as_str()),
            SourceResult::ReadTheDocs(r) => Some(r.url.as_str()),
        }
        .filter(|url| !url.is_empty())
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            SourceResult::Index(hit) => Some(hit.content.as_str()),
            SourceResult::CodeHost(r) => Some(r.summary.as_str()),
            SourceResult::ReferenceDocs(r) => Some(r.summary.as_str()),
            SourceResult::ReadTheDocs(r) => r.highlights.first().map(String::as_str),
        }
        .filter(|s| !s.is_empty())
    }

    /// Source-native relevance score, if the source ranks its results.
    pub fn score(&self) -> Option<f64> {
        match self {
            SourceResult::Index(hit) => hit.score,
            SourceResult::CodeHost(r) => r.score,
            SourceResult::ReferenceDocs(r) => r.score,
            SourceResult::ReadTheDocs(_) => None,
        }
    }

    /// The value a synthetic id is derived from: url, else title, else the serialized result.
    pub fn identity_key(&self) -> String {
        if let Some(url) = self.url() {
            return url.to_string();
        }
        if !self.title().is_empty() {
            return self.title().to_string();
        }
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Project into the common result shape under the given id.
    pub fn into_normalized(self, id: String) -> NormalizedResult {
        let source = self.kind();
        let url = self.url().map(str::to_string);
        let score = self.score().filter(|s| s.is_finite()).unwrap_or(0.0);

        let (title, description, highlights) = match self {
            SourceResult::Index(hit) => (hit.title, hit.content, hit.highlights.non_empty()),
            SourceResult::CodeHost(r) => (r.title, format!("{} ({})", r.summary, r.repository), None),
            SourceResult::ReferenceDocs(r) => {
                let highlights = Highlights {
                    title: vec![],
                    content: r.highlights,
                };
                (r.title, r.summary, highlights.non_empty())
            }
            SourceResult::ReadTheDocs(r) => {
                let description = r
                    .highlights
                    .first()
                    .cloned()
                    .unwrap_or_else(|| format!("{} documentation", r.project));
                let highlights = Highlights {
                    title: vec![],
                    content: r.highlights,
                };
                (r.title, description, highlights.non_empty())
            }
        };

        NormalizedResult {
            id,
            title,
            description,
            url,
            source,
            score,
            highlights,
        }
    }
}

/// A result in the merged, ranked response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    /// Synthetic id, stable across identical requests
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: SourceKind,
    /// Relevance score (0 when the source provides none)
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
}

/// Merged search response.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Number of merged results before truncation to the page size
    pub total: usize,
    pub results: Vec<NormalizedResult>,
    pub metadata: SearchMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_query: Option<String>,
    pub language: String,
    pub framework: Option<String>,
    /// Whether each source was reachable and contributed
    pub sources: BTreeMap<SourceKind, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
}

/// Liveness of the index backend. Recomputed on every probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHealth {
    pub is_running: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_nodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_shards: Option<u32>,
}

impl SourceHealth {
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            is_running: false,
            status: "red".to_string(),
            error: Some(error.into()),
            number_of_nodes: None,
            active_shards: None,
        }
    }
}

/// Externally fetched result written back into the index for future direct search.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalDocument {
    pub title: String,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub score: Option<f64>,
    pub source: SourceKind,
    pub language: String,
    pub framework: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(rename = "type")]
    pub doc_type: &'static str,
}
