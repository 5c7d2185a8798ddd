//! Research request envelope and per-request tool context.

use serde::{Deserialize, Serialize};

/// Lower bound for `match_count`
pub const MIN_MATCH_COUNT: usize = 1;

/// Upper bound for `match_count`
pub const MAX_MATCH_COUNT: usize = 20;

/// Request body for `POST /api/research/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// The research question or query
    pub query: String,

    /// Optional source ID to filter results
    #[serde(default)]
    pub source_filter: Option<String>,

    /// Maximum results per internal search
    #[serde(default = "default_match_count")]
    pub match_count: usize,

    /// Enable web fetching (disabled by default)
    #[serde(default)]
    pub enable_web_search: bool,
}

impl ResearchRequest {
    /// Create a request with defaults for the optional fields
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source_filter: None,
            match_count: default_match_count(),
            enable_web_search: false,
        }
    }

    /// Validate field bounds. Must pass before any agent work starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query must not be empty".to_string());
        }
        if !(MIN_MATCH_COUNT..=MAX_MATCH_COUNT).contains(&self.match_count) {
            return Err(format!(
                "match_count must be between {} and {}, got {}",
                MIN_MATCH_COUNT, MAX_MATCH_COUNT, self.match_count
            ));
        }
        Ok(())
    }
}

fn default_match_count() -> usize {
    5
}

/// Per-request context threaded through every tool invocation
#[derive(Debug, Clone)]
pub struct ResearchDependencies {
    /// Request-level source filter applied when a tool call passes none
    pub source_filter: Option<String>,

    /// Maximum results per search
    pub match_count: usize,

    /// Gate for the web fetch tool
    pub enable_web_search: bool,
}

impl Default for ResearchDependencies {
    fn default() -> Self {
        Self {
            source_filter: None,
            match_count: default_match_count(),
            enable_web_search: false,
        }
    }
}

impl From<&ResearchRequest> for ResearchDependencies {
    fn from(request: &ResearchRequest) -> Self {
        Self {
            source_filter: request.source_filter.clone(),
            match_count: request.match_count,
            enable_web_search: request.enable_web_search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let request: ResearchRequest = serde_json::from_str(r#"{"query": "test"}"#).unwrap();
        assert_eq!(request.query, "test");
        assert_eq!(request.match_count, 5);
        assert!(!request.enable_web_search);
        assert!(request.source_filter.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_match_count_bounds() {
        let mut request = ResearchRequest::new("test");

        request.match_count = 0;
        assert!(request.validate().is_err());

        request.match_count = 21;
        assert!(request.validate().is_err());

        request.match_count = 1;
        assert!(request.validate().is_ok());

        request.match_count = 20;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_query_rejected() {
        let request = ResearchRequest::new("   ");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_dependencies_from_request() {
        let request: ResearchRequest = serde_json::from_str(
            r#"{"query": "q", "source_filter": "src_docs", "match_count": 7, "enable_web_search": true}"#,
        )
        .unwrap();

        let deps = ResearchDependencies::from(&request);
        assert_eq!(deps.source_filter.as_deref(), Some("src_docs"));
        assert_eq!(deps.match_count, 7);
        assert!(deps.enable_web_search);
    }
}
