//! Wire models for the external knowledge, code-example, and catalog services.
//!
//! Every field is defaulted: these services are outside our control and the
//! tools must degrade to a readable message rather than a parse failure when
//! a field goes missing.

use serde::Deserialize;

/// Metadata block attached to knowledge and code results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Response of `POST {base}/api/knowledge-items/search`
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeSearchResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<KnowledgeResult>,
}

/// One knowledge-base hit
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeResult {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rerank_score: Option<f64>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl KnowledgeResult {
    /// Rerank score when present, similarity score otherwise
    pub fn relevance(&self) -> f64 {
        self.rerank_score
            .or(self.similarity_score)
            .unwrap_or_default()
    }
}

/// Response of `POST {base}/api/rag/code-examples`
#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<CodeExample>,
}

/// One code-example hit
#[derive(Debug, Clone, Deserialize)]
pub struct CodeExample {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Response of `GET {base}/api/rag/sources`
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCatalog {
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

/// One entry in the source catalog
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDescriptor {
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub total_words: u64,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_response_defaults() {
        let response: KnowledgeSearchResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.success);
        assert!(response.results.is_empty());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_relevance_prefers_rerank_score() {
        let result: KnowledgeResult = serde_json::from_str(
            r#"{"content": "c", "rerank_score": 0.9, "similarity_score": 0.5}"#,
        )
        .unwrap();
        assert_eq!(result.relevance(), 0.9);

        let result: KnowledgeResult =
            serde_json::from_str(r#"{"content": "c", "similarity_score": 0.5}"#).unwrap();
        assert_eq!(result.relevance(), 0.5);

        let result: KnowledgeResult = serde_json::from_str(r#"{"content": "c"}"#).unwrap();
        assert_eq!(result.relevance(), 0.0);
    }

    #[test]
    fn test_catalog_parses_partial_entries() {
        let catalog: SourceCatalog = serde_json::from_str(
            r#"{"sources": [{"source_id": "src_docs", "total_words": 1234}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.sources.len(), 1);
        assert_eq!(catalog.sources[0].source_id, "src_docs");
        assert!(catalog.sources[0].title.is_none());
    }
}
