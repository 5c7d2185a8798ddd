//! Source catalog listing tool.

use serde_json::Value;
use url::Url;

use crate::models::{ResearchDependencies, SourceCatalog};
use crate::tools::{ToolError, ToolHandler};
use crate::utils::HttpClient;

const SOURCES_PATH: &str = "/api/rag/sources";

/// Lists the knowledge sources available for searching
#[derive(Debug, Clone)]
pub struct ListSourcesTool {
    client: HttpClient,
    api_url: Url,
}

impl ListSourcesTool {
    pub fn new(client: HttpClient, api_url: Url) -> Self {
        Self { client, api_url }
    }

    /// Fetch and format the catalog. Also used directly by the CLI
    /// `sources` subcommand.
    pub async fn list(&self) -> Result<String, ToolError> {
        let url = self
            .api_url
            .join(SOURCES_PATH)
            .map_err(|e| ToolError::Api(format!("invalid catalog URL: {}", e)))?;

        let response = self.client.client().get(url).send().await?;
        if !response.status().is_success() {
            return Err(ToolError::Api(format!(
                "catalog endpoint returned status {}",
                response.status()
            )));
        }

        let data: SourceCatalog = response
            .json()
            .await
            .map_err(|e| ToolError::Parse(e.to_string()))?;

        if data.sources.is_empty() {
            return Ok("No sources available. Crawl some documentation first.".to_string());
        }

        let formatted: Vec<String> = data
            .sources
            .iter()
            .map(|src| {
                let title = src.title.as_deref().unwrap_or("Untitled");
                format!(
                    "- **{}**: {} ({} words)",
                    src.source_id,
                    title,
                    group_thousands(src.total_words)
                )
            })
            .collect();

        Ok(format!(
            "Available sources ({}):\n{}",
            data.sources.len(),
            formatted.join("\n")
        ))
    }
}

/// Render a count with comma separators (1234567 -> "1,234,567")
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[async_trait::async_trait]
impl ToolHandler for ListSourcesTool {
    async fn execute(&self, _deps: &ResearchDependencies, _args: Value) -> String {
        match self.list().await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "list sources error");
                format!("Error listing sources: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_guidance() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SOURCES_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sources": []}"#)
            .create_async()
            .await;

        let tool = ListSourcesTool::new(HttpClient::new(), Url::parse(&server.url()).unwrap());
        let output = tool
            .execute(&ResearchDependencies::default(), serde_json::json!({}))
            .await;

        assert!(output.contains("No sources available"));
    }

    #[tokio::test]
    async fn test_formats_bulleted_catalog() {
        let body = serde_json::json!({
            "sources": [
                {"source_id": "src_fastapi", "title": "FastAPI Docs", "total_words": 120000},
                {"source_id": "src_misc", "total_words": 42}
            ]
        });

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SOURCES_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let tool = ListSourcesTool::new(HttpClient::new(), Url::parse(&server.url()).unwrap());
        let output = tool
            .execute(&ResearchDependencies::default(), serde_json::json!({}))
            .await;

        assert!(output.starts_with("Available sources (2):"));
        assert!(output.contains("- **src_fastapi**: FastAPI Docs (120,000 words)"));
        assert!(output.contains("- **src_misc**: Untitled (42 words)"));
    }

    #[tokio::test]
    async fn test_http_error_becomes_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SOURCES_PATH)
            .with_status(502)
            .create_async()
            .await;

        let tool = ListSourcesTool::new(HttpClient::new(), Url::parse(&server.url()).unwrap());
        let output = tool
            .execute(&ResearchDependencies::default(), serde_json::json!({}))
            .await;

        assert!(output.starts_with("Error listing sources:"));
    }
}
