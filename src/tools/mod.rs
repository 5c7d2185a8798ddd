//! LLM-callable research tools.
//!
//! Tools are declared as an explicit ordered table of
//! `{name, description, input_schema, handler}` records handed to the LLM
//! runtime as function definitions. Handlers always return a human-readable
//! string: every failure at this level (network, HTTP status, malformed
//! JSON, empty results) is absorbed into a descriptive message for the model
//! rather than propagated as an error.

mod catalog;
mod code;
mod knowledge;
mod webpage;

pub use catalog::ListSourcesTool;
pub use code::CodeSearchTool;
pub use knowledge::KnowledgeSearchTool;
pub use webpage::{FetchWebpageTool, WEB_FETCH_DISABLED_MESSAGE};

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::models::ResearchDependencies;
use crate::utils::HttpClient;

/// Errors internal to a tool invocation. Never crosses the tool boundary:
/// [`ToolHandler::execute`] converts these into text for the model.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Network or HTTP transport error
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status or error reported by the upstream service
    #[error("API error: {0}")]
    Api(String),

    /// Malformed response payload
    #[error("parse error: {0}")]
    Parse(String),

    /// The model supplied unusable arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Parse(err.to_string())
    }
}

/// Handler for executing a tool on behalf of the LLM
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the model-supplied arguments.
    ///
    /// Always returns text; failures are described, not raised.
    async fn execute(&self, deps: &ResearchDependencies, args: Value) -> String;
}

/// A tool the LLM runtime may call during reasoning
#[derive(Clone)]
pub struct AgentTool {
    /// Tool name (e.g., "search_knowledge_base")
    pub name: String,

    /// Human-readable description shown to the model
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for AgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// The ordered table of tools handed to the LLM runtime
#[derive(Debug, Clone)]
pub struct ToolSet {
    tools: Vec<AgentTool>,
}

impl ToolSet {
    /// Build the standard research tool table: knowledge-base search,
    /// code-example search, source listing, and web fetch.
    pub fn standard(client: HttpClient, api_url: Url) -> Self {
        let tools = vec![
            AgentTool {
                name: "search_knowledge_base".to_string(),
                description: "Search the knowledge base for relevant documentation and content. \
                              Returns formatted results with content snippets and source URLs."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query (natural language)"
                        },
                        "source_id": {
                            "type": "string",
                            "description": "Optional source ID to filter results (use list_sources to see available)"
                        }
                    },
                    "required": ["query"]
                }),
                handler: Arc::new(KnowledgeSearchTool::new(client.clone(), api_url.clone())),
            },
            AgentTool {
                name: "search_code_examples".to_string(),
                description: "Search for code examples in the knowledge base. Returns code \
                              snippets with explanations and source URLs."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query for code (e.g., \"FastAPI dependency injection\")"
                        },
                        "source_id": {
                            "type": "string",
                            "description": "Optional source ID to filter (e.g., a specific docs source)"
                        }
                    },
                    "required": ["query"]
                }),
                handler: Arc::new(CodeSearchTool::new(client.clone(), api_url.clone())),
            },
            AgentTool {
                name: "list_sources".to_string(),
                description: "List all available knowledge sources that can be searched, with \
                              IDs, titles, and word counts."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {}
                }),
                handler: Arc::new(ListSourcesTool::new(client.clone(), api_url.clone())),
            },
            AgentTool {
                name: "fetch_webpage".to_string(),
                description: "Fetch a webpage and return its main text content.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "The URL to fetch"
                        },
                        "extract_prompt": {
                            "type": "string",
                            "description": "What to extract from the page"
                        }
                    },
                    "required": ["url"]
                }),
                handler: Arc::new(FetchWebpageTool::new(client)),
            },
        ];

        Self { tools }
    }

    /// All tools, in registration order
    pub fn all(&self) -> &[AgentTool] {
        &self.tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&AgentTool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Execute a tool by name.
    ///
    /// An unknown tool name is a model mistake, answered with guidance text
    /// like any other tool-level failure.
    pub async fn dispatch(&self, deps: &ResearchDependencies, name: &str, args: Value) -> String {
        match self.get(name) {
            Some(tool) => tool.handler.execute(deps, args).await,
            None => {
                tracing::warn!(tool = name, "model requested unknown tool");
                format!("Tool '{}' is not available.", name)
            }
        }
    }
}
