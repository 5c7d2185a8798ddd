//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::utils::{HttpClient, HEALTH_TIMEOUT, QUERY_TIMEOUT};

const QUERY_PATH: &str = "/api/research/query";
const HEALTH_PATH: &str = "/api/research/health";

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "research_query")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry exposing the research tools against the given
    /// REST endpoint base URL.
    pub fn new(api_url: Url) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        // research_query - forward to the REST endpoint with the long
        // timeout tier; LLM-backed queries are slow.
        registry.register(Tool {
            name: "research_query".to_string(),
            description: "Execute an AI-powered research query. The agent searches the \
                          knowledge base, finds code examples when applicable, optionally \
                          fetches web pages, and synthesizes a comprehensive, cited answer. \
                          More powerful than a raw knowledge-base search: it reasons about \
                          which tools to use and combines multiple searches automatically."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Your research question (natural language, can be detailed)"
                    },
                    "source_filter": {
                        "type": "string",
                        "description": "Optional source ID to focus the search"
                    },
                    "match_count": {
                        "type": "integer",
                        "description": "Max results per internal search",
                        "default": 5
                    },
                    "enable_web_search": {
                        "type": "boolean",
                        "description": "Allow fetching external web pages",
                        "default": false
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(ResearchQueryHandler {
                client: HttpClient::with_timeouts(QUERY_TIMEOUT, Duration::from_secs(10)),
                api_url: api_url.clone(),
            }),
        });

        // research_health - republish the REST health fields
        registry.register(Tool {
            name: "research_health".to_string(),
            description: "Check if the research agent is available and properly configured."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            handler: Arc::new(ResearchHealthHandler {
                client: HttpClient::with_timeouts(HEALTH_TIMEOUT, Duration::from_secs(5)),
                api_url,
            }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

/// Failure envelope shared by the research_query mappings
fn query_failure(query: &str, error: impl Into<String>) -> Value {
    serde_json::json!({
        "success": false,
        "query": query,
        "answer": "",
        "error": error.into(),
    })
}

/// Handler forwarding research queries to the REST endpoint
#[derive(Debug, Clone)]
pub struct ResearchQueryHandler {
    pub(crate) client: HttpClient,
    pub(crate) api_url: Url,
}

#[async_trait::async_trait]
impl ToolHandler for ResearchQueryHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'query' parameter")?
            .to_string();

        let match_count = args.get("match_count").and_then(|v| v.as_u64()).unwrap_or(5);
        let enable_web_search = args
            .get("enable_web_search")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let mut request = serde_json::json!({
            "query": query,
            "match_count": match_count,
            "enable_web_search": enable_web_search,
        });
        if let Some(filter) = args.get("source_filter").and_then(|v| v.as_str()) {
            request["source_filter"] = Value::String(filter.to_string());
        }

        let url = self
            .api_url
            .join(QUERY_PATH)
            .map_err(|e| format!("Invalid API URL: {}", e))?;

        match self.client.client().post(url).json(&request).send().await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK {
                    match response.json::<Value>().await {
                        Ok(result) => Ok(serde_json::json!({
                            "success": result.get("success").and_then(|v| v.as_bool()).unwrap_or(true),
                            "query": result.get("query").and_then(|v| v.as_str()).unwrap_or(&query),
                            "answer": result.get("answer").and_then(|v| v.as_str()).unwrap_or(""),
                            "error": result.get("error").cloned().unwrap_or(Value::Null),
                        })),
                        Err(e) => Ok(query_failure(
                            &query,
                            format!("Invalid response from research endpoint: {}", e),
                        )),
                    }
                } else if status == StatusCode::SERVICE_UNAVAILABLE {
                    Ok(query_failure(
                        &query,
                        "Research agent unavailable - OpenAI API key not configured",
                    ))
                } else {
                    let detail = response.text().await.unwrap_or_default();
                    Ok(query_failure(
                        &query,
                        format!("HTTP {}: {}", status.as_u16(), detail),
                    ))
                }
            }
            Err(e) if e.is_timeout() => Ok(query_failure(
                &query,
                "Request timed out - the query may be too complex",
            )),
            Err(e) => {
                tracing::error!(error = %e, "research query error");
                Ok(query_failure(&query, e.to_string()))
            }
        }
    }
}

/// Handler republishing the REST health fields
#[derive(Debug, Clone)]
pub struct ResearchHealthHandler {
    pub(crate) client: HttpClient,
    pub(crate) api_url: Url,
}

#[async_trait::async_trait]
impl ToolHandler for ResearchHealthHandler {
    async fn execute(&self, _args: Value) -> Result<Value, String> {
        let url = self
            .api_url
            .join(HEALTH_PATH)
            .map_err(|e| format!("Invalid API URL: {}", e))?;

        match self.client.client().get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK {
                    match response.json::<Value>().await {
                        Ok(result) => Ok(serde_json::json!({
                            "success": true,
                            "available": result.get("available").and_then(|v| v.as_bool()).unwrap_or(false),
                            "openai_configured": result.get("openai_key_configured").and_then(|v| v.as_bool()).unwrap_or(false),
                            "agent_ready": result.get("agent_importable").and_then(|v| v.as_bool()).unwrap_or(false),
                        })),
                        Err(e) => Ok(serde_json::json!({
                            "success": false,
                            "available": false,
                            "error": e.to_string(),
                        })),
                    }
                } else {
                    Ok(serde_json::json!({
                        "success": false,
                        "available": false,
                        "error": format!("HTTP {}", status.as_u16()),
                    }))
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "research health check error");
                Ok(serde_json::json!({
                    "success": false,
                    "available": false,
                    "error": e.to_string(),
                }))
            }
        }
    }
}
