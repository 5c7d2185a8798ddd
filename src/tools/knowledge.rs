//! Knowledge-base search tool.

use serde_json::Value;
use url::Url;

use crate::models::{KnowledgeResult, KnowledgeSearchResponse, ResearchDependencies};
use crate::tools::{ToolError, ToolHandler};
use crate::utils::{truncate_chars, HttpClient};

const SEARCH_PATH: &str = "/api/knowledge-items/search";

/// Snippet length limit per result
const SNIPPET_LIMIT: usize = 600;

/// Only the top hits are formatted for the model
const MAX_FORMATTED: usize = 5;

/// Searches the knowledge-item service and formats the hits for the model
#[derive(Debug, Clone)]
pub struct KnowledgeSearchTool {
    client: HttpClient,
    api_url: Url,
}

impl KnowledgeSearchTool {
    pub fn new(client: HttpClient, api_url: Url) -> Self {
        Self { client, api_url }
    }

    async fn run(&self, deps: &ResearchDependencies, args: &Value) -> Result<String, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'query' parameter".to_string()))?;

        // Explicit per-call source wins over the request-level filter
        let source = args
            .get("source_id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| deps.source_filter.clone());

        let mut payload = serde_json::json!({
            "query": query,
            "match_count": deps.match_count,
        });
        if let Some(source) = source {
            payload["source"] = Value::String(source);
        }

        let url = self
            .api_url
            .join(SEARCH_PATH)
            .map_err(|e| ToolError::Api(format!("invalid search URL: {}", e)))?;

        let response = self.client.client().post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ToolError::Api(format!(
                "search endpoint returned status {}",
                response.status()
            )));
        }

        let data: KnowledgeSearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Parse(e.to_string()))?;

        if !data.success {
            return Ok(format!(
                "Search failed: {}",
                data.error.unwrap_or_else(|| "Unknown error".to_string())
            ));
        }

        if data.results.is_empty() {
            return Ok(
                "No results found. Try different search terms or remove source filters."
                    .to_string(),
            );
        }

        Ok(format_results(&data.results))
    }
}

fn format_results(results: &[KnowledgeResult]) -> String {
    let formatted: Vec<String> = results
        .iter()
        .take(MAX_FORMATTED)
        .enumerate()
        .map(|(i, res)| {
            let title = res.metadata.title.as_deref().unwrap_or("Untitled");
            let url = res.metadata.url.as_deref().unwrap_or_default();
            format!(
                "**[{}] {}**\nURL: {}\nRelevance: {:.2}\nContent: {}\n",
                i + 1,
                title,
                url,
                res.relevance(),
                truncate_chars(&res.content, SNIPPET_LIMIT)
            )
        })
        .collect();

    format!(
        "Found {} results:\n\n{}",
        results.len(),
        formatted.join("\n---\n")
    )
}

#[async_trait::async_trait]
impl ToolHandler for KnowledgeSearchTool {
    async fn execute(&self, deps: &ResearchDependencies, args: Value) -> String {
        match self.run(deps, &args).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "knowledge base search error");
                format!("Error searching knowledge base: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn tool(server: &mockito::ServerGuard) -> KnowledgeSearchTool {
        KnowledgeSearchTool::new(HttpClient::new(), Url::parse(&server.url()).unwrap())
    }

    #[tokio::test]
    async fn test_empty_results_yield_guidance() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEARCH_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "results": []}"#)
            .create_async()
            .await;

        let output = tool(&server)
            .execute(
                &ResearchDependencies::default(),
                serde_json::json!({"query": "missing topic"}),
            )
            .await;

        mock.assert_async().await;
        assert!(output.contains("No results"));
    }

    #[tokio::test]
    async fn test_formats_results_with_truncation() {
        let long_content = "x".repeat(700);
        let body = serde_json::json!({
            "success": true,
            "results": [{
                "content": long_content,
                "rerank_score": 0.87,
                "metadata": {"title": "Guide", "url": "https://docs.example.com/guide"}
            }]
        });

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SEARCH_PATH)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "query": "guide",
                "match_count": 5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let output = tool(&server)
            .execute(
                &ResearchDependencies::default(),
                serde_json::json!({"query": "guide"}),
            )
            .await;

        assert!(output.starts_with("Found 1 results:"));
        assert!(output.contains("**[1] Guide**"));
        assert!(output.contains("Relevance: 0.87"));
        assert!(output.contains(&format!("{}...", "x".repeat(600))));
        assert!(!output.contains(&"x".repeat(601)));
    }

    #[tokio::test]
    async fn test_request_filter_is_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEARCH_PATH)
            .match_body(Matcher::PartialJson(
                serde_json::json!({"source": "src_docs"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "results": []}"#)
            .create_async()
            .await;

        let deps = ResearchDependencies {
            source_filter: Some("src_docs".to_string()),
            ..Default::default()
        };
        tool(&server)
            .execute(&deps, serde_json::json!({"query": "q"}))
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failures_become_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SEARCH_PATH)
            .with_status(500)
            .create_async()
            .await;

        let output = tool(&server)
            .execute(
                &ResearchDependencies::default(),
                serde_json::json!({"query": "q"}),
            )
            .await;

        assert!(output.starts_with("Error searching knowledge base:"));
    }

    #[tokio::test]
    async fn test_upstream_failure_flag() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SEARCH_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "error": "index offline"}"#)
            .create_async()
            .await;

        let output = tool(&server)
            .execute(
                &ResearchDependencies::default(),
                serde_json::json!({"query": "q"}),
            )
            .await;

        assert_eq!(output, "Search failed: index offline");
    }
}
