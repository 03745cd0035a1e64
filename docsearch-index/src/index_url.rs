#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexURL(String);

impl AsRef<str> for IndexURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndexURL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl IndexURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_handles_slashes() {
        let base = IndexURL::new("http://localhost:9200/");
        assert_eq!(
            base.append_path("/_cluster/health").as_ref(),
            "http://localhost:9200/_cluster/health"
        );
        assert_eq!(
            IndexURL::new("http://es:9200").append_path("docs/_search").as_ref(),
            "http://es:9200/docs/_search"
        );
    }
}
