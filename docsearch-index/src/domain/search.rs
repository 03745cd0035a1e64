use std::collections::HashMap;

use serde::Deserialize;

/// Response envelope of `POST /{index}/_search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub took: Option<u64>,
    pub hits: Hits<T>,
}

#[derive(Debug, Deserialize)]
pub struct Hits<T> {
    #[serde(default)]
    pub total: Option<HitsTotal>,
    #[serde(default)]
    pub max_score: Option<f64>,
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HitsTotal {
    pub value: u64,
}

#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: T,
    /// Highlighted fragments keyed by field name.
    #[serde(default)]
    pub highlight: HashMap<String, Vec<String>>,
}

impl<T> SearchResponse<T> {
    pub fn into_hits(self) -> Vec<Hit<T>> {
        self.hits.hits
    }
}
