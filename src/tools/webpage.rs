//! Web-page fetch tool.

use serde_json::Value;

use crate::models::ResearchDependencies;
use crate::tools::{ToolError, ToolHandler};
use crate::utils::{strip_html, truncate_chars, HttpClient};

/// Fixed refusal returned when the request disabled web fetching
pub const WEB_FETCH_DISABLED_MESSAGE: &str = "Web fetching is disabled for this session.";

/// Page text limit after tag stripping
const PAGE_LIMIT: usize = 5000;

/// Fetches a page and returns its visible text, tag-stripped and truncated.
///
/// The `extract_prompt` argument is accepted for interface compatibility but
/// does not drive extraction; stripping is purely structural.
#[derive(Debug, Clone)]
pub struct FetchWebpageTool {
    client: HttpClient,
}

impl FetchWebpageTool {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn run(&self, args: &Value) -> Result<String, ToolError> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'url' parameter".to_string()))?;

        let response = self.client.client().get(url).send().await?;
        if !response.status().is_success() {
            return Err(ToolError::Api(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let html = response.text().await?;
        let content = truncate_chars(&strip_html(&html), PAGE_LIMIT);

        Ok(format!("**Content from {}:**\n\n{}", url, content))
    }
}

#[async_trait::async_trait]
impl ToolHandler for FetchWebpageTool {
    async fn execute(&self, deps: &ResearchDependencies, args: Value) -> String {
        // Checked before any network activity
        if !deps.enable_web_search {
            return WEB_FETCH_DISABLED_MESSAGE.to_string();
        }

        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing url>")
            .to_string();

        match self.run(&args).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, url = %url, "web fetch error");
                format!("Error fetching {}: {}", url, e)
            }
        }
    }
}
