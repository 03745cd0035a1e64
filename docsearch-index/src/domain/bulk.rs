use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::IndexClientError;

/// Summary of a `POST /_bulk` call.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: Option<u64>,
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl BulkResponse {
    /// Number of item actions acknowledged by the backend.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkTarget<'a>,
}

#[derive(Serialize)]
struct BulkTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
}

/// Build the NDJSON body for a bulk `index` request. Every line, including the last,
/// is newline terminated as the bulk API requires.
pub fn bulk_body<T: Serialize>(index: &str, docs: &[T]) -> Result<String, IndexClientError> {
    let action = serde_json::to_string(&BulkAction {
        index: BulkTarget { index },
    })
    .map_err(|e| IndexClientError::ParsingError(e.to_string()))?;

    let mut body = String::new();
    for doc in docs {
        let line =
            serde_json::to_string(doc).map_err(|e| IndexClientError::ParsingError(e.to_string()))?;
        body.push_str(&action);
        body.push('\n');
        body.push_str(&line);
        body.push('\n');
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Doc {
        title: &'static str,
    }

    #[test]
    fn bulk_body_interleaves_actions_and_documents() {
        let body = bulk_body("external_docs", &[Doc { title: "a" }, Doc { title: "b" }]).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#"{"index":{"_index":"external_docs"}}"#);
        assert_eq!(lines[1], r#"{"title":"a"}"#);
        assert_eq!(lines[3], r#"{"title":"b"}"#);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn bulk_body_empty_for_no_documents() {
        let docs: Vec<Doc> = vec![];
        assert!(bulk_body("external_docs", &docs).unwrap().is_empty());
    }
}
