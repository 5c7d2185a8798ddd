//! Code-example search tool.

use serde_json::Value;
use url::Url;

use crate::models::{CodeExample, CodeSearchResponse, ResearchDependencies};
use crate::tools::{ToolError, ToolHandler};
use crate::utils::{truncate_chars, HttpClient};

const SEARCH_PATH: &str = "/api/rag/code-examples";

/// Code snippets get more room than prose snippets
const CODE_LIMIT: usize = 800;

const MAX_FORMATTED: usize = 5;

/// Searches the code-example service and formats hits as fenced blocks
#[derive(Debug, Clone)]
pub struct CodeSearchTool {
    client: HttpClient,
    api_url: Url,
}

impl CodeSearchTool {
    pub fn new(client: HttpClient, api_url: Url) -> Self {
        Self { client, api_url }
    }

    async fn run(&self, deps: &ResearchDependencies, args: &Value) -> Result<String, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'query' parameter".to_string()))?;

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
            payload["source_id"] = Value::String(source);
        }

        let url = self
            .api_url
            .join(SEARCH_PATH)
            .map_err(|e| ToolError::Api(format!("invalid search URL: {}", e)))?;

        let response = self.client.client().post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ToolError::Api(format!(
                "code search endpoint returned status {}",
                response.status()
            )));
        }

        let data: CodeSearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Parse(e.to_string()))?;

        if !data.success {
            return Ok(format!(
                "Code search failed: {}",
                data.error.unwrap_or_else(|| "Unknown error".to_string())
            ));
        }

        if data.results.is_empty() {
            return Ok("No code examples found. Try different search terms.".to_string());
        }

        Ok(format_examples(&data.results))
    }
}

fn format_examples(results: &[CodeExample]) -> String {
    let formatted: Vec<String> = results
        .iter()
        .take(MAX_FORMATTED)
        .enumerate()
        .map(|(i, res)| {
            let title = res.metadata.title.as_deref().unwrap_or("Code Example");
            let language = res.metadata.language.as_deref().unwrap_or_default();
            format!(
                "**[{}] {}**\nURL: {}\nSummary: {}\n```{}\n{}\n```\n",
                i + 1,
                title,
                res.url,
                res.summary,
                language,
                truncate_chars(&res.code, CODE_LIMIT)
            )
        })
        .collect();

    format!(
        "Found {} code examples:\n\n{}",
        results.len(),
        formatted.join("\n---\n")
    )
}

#[async_trait::async_trait]
impl ToolHandler for CodeSearchTool {
    async fn execute(&self, deps: &ResearchDependencies, args: Value) -> String {
        match self.run(deps, &args).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "code search error");
                format!("Error searching code examples: {}", e)
            }
        }
    }
}
