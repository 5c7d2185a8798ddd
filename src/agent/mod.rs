//! Research agent: delegates a user query to the LLM runtime configured
//! with the research tool table and returns its final text output.
//!
//! The agent itself contains no reasoning. Tool selection and answer
//! synthesis happen inside the remote model; this module only drives the
//! function-calling loop: send the conversation, execute whatever tool
//! calls come back, feed the results in, repeat until the model answers.

mod llm;

pub use llm::{AssistantMessage, FunctionCall, LlmClient, ToolCall, ToolSpec};

use std::sync::Arc;
use url::Url;

use crate::config::AgentConfig;
use crate::models::ResearchDependencies;
use crate::tools::ToolSet;
use crate::utils::{with_retry, HttpClient, RetryConfig};

/// Hard cap on tool rounds per query; a model stuck in a tool loop is
/// surfaced as an error instead of burning tokens forever.
pub const MAX_TOOL_ROUNDS: usize = 8;

const SYSTEM_PROMPT: &str = "\
You are a research assistant with access to an indexed knowledge base and supporting tools.

**Your Capabilities:**
1. **Knowledge Base Search** - Search through crawled documentation and articles
2. **Code Examples** - Find relevant code snippets and implementation patterns
3. **Web Fetch** - Retrieve and analyze web pages for current information
4. **Source Discovery** - List available knowledge sources

**Your Approach:**
1. Understand what the user is asking for
2. Choose the appropriate tool(s) to gather information
3. Synthesize information from multiple sources when needed
4. Provide clear, well-structured answers with citations
5. Include code examples when relevant

**Guidelines:**
- Always cite your sources with URLs when available
- If you can't find information, say so clearly
- For code questions, search code examples first
- For conceptual questions, search the knowledge base
- Combine information from multiple searches when needed
- Be concise but thorough

Use the `list_sources` tool to see all available documentation that has been indexed.";

/// Errors that can occur while running the agent
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent cannot be assembled from the current configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or connection failure reaching the LLM runtime
    #[error("network error: {0}")]
    Network(String),

    /// The LLM call exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// Non-success status from the LLM runtime
    #[error("LLM API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Malformed completion payload
    #[error("parse error: {0}")]
    Parse(String),

    /// The model kept calling tools past the round budget
    #[error("agent exceeded {0} tool rounds without producing an answer")]
    ToolRoundsExceeded(usize),
}

impl AgentError {
    /// Whether a retry might help
    pub fn is_transient(&self) -> bool {
        match self {
            AgentError::Network(_) | AgentError::Timeout => true,
            AgentError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Anything that can execute a research query.
///
/// The REST layer holds a trait object so tests can swap the live agent
/// for a stub.
#[async_trait::async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, query: &str, deps: &ResearchDependencies) -> Result<String, AgentError>;
}

/// Research agent wired to the standard tool table
#[derive(Debug)]
pub struct ResearchAgent {
    llm: LlmClient,
    tools: ToolSet,
    retry: RetryConfig,
}

impl ResearchAgent {
    /// Assemble an agent from configuration.
    ///
    /// Fails when the credential is missing or a base URL does not parse;
    /// the REST layer checks the credential first and turns this distinct
    /// failure into a 503.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        if !config.openai_key_configured() {
            return Err(AgentError::Config(
                "OpenAI API key not configured".to_string(),
            ));
        }

        let api_url = Url::parse(&config.api_url)
            .map_err(|e| AgentError::Config(format!("invalid API base URL: {}", e)))?;

        let api_key = config.openai_api_key.as_deref().unwrap_or_default();
        let llm = LlmClient::new(&config.openai_base_url, api_key, &config.model);
        let tools = ToolSet::standard(HttpClient::new(), api_url);

        Ok(Self {
            llm,
            tools,
            retry: RetryConfig::with_attempts(config.retries),
        })
    }

    /// Assemble an agent from pre-built parts
    pub fn with_parts(llm: LlmClient, tools: ToolSet, retry: RetryConfig) -> Self {
        Self { llm, tools, retry }
    }

    /// Run a query to completion and return the model's final text.
    pub async fn run(
        &self,
        query: &str,
        deps: &ResearchDependencies,
    ) -> Result<String, AgentError> {
        let specs: Vec<ToolSpec> = self.tools.all().iter().map(ToolSpec::from).collect();

        let mut messages = vec![
            serde_json::json!({
                "role": "system",
                "content": format!("{}\n\n{}", SYSTEM_PROMPT, context_block(deps)),
            }),
            serde_json::json!({"role": "user", "content": query}),
        ];

        for round in 0..MAX_TOOL_ROUNDS {
            let llm = &self.llm;
            let conversation = &messages;
            let reply =
                with_retry(self.retry, || llm.complete(conversation, &specs)).await?;

            let calls = reply.calls().to_vec();
            if calls.is_empty() {
                return Ok(reply.content.unwrap_or_default());
            }

            tracing::debug!(round, tool_calls = calls.len(), "executing tool calls");
            messages.push(reply.to_message_value());

            for call in calls {
                let output = self
                    .tools
                    .dispatch(deps, &call.function.name, call.function.parsed_arguments())
                    .await;
                messages.push(serde_json::json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": output,
                }));
            }
        }

        Err(AgentError::ToolRoundsExceeded(MAX_TOOL_ROUNDS))
    }
}

/// Per-request context appended to the system prompt
fn context_block(deps: &ResearchDependencies) -> String {
    let source_info = match &deps.source_filter {
        Some(filter) => format!("Source Filter: {}", filter),
        None => "Searching all sources".to_string(),
    };
    let web_info = if deps.enable_web_search {
        "Web search enabled"
    } else {
        "Web search disabled"
    };

    format!(
        "**Current Context:**\n- {}\n- {}\n- Max results per search: {}\n- Timestamp: {}",
        source_info,
        web_info,
        deps.match_count,
        chrono::Utc::now().to_rfc3339()
    )
}

/// Default [`AgentRunner`]: builds a fresh [`ResearchAgent`] per request,
/// matching the one-shot lifetime of everything else in a query.
#[derive(Debug, Clone)]
pub struct LiveAgentRunner {
    config: Arc<AgentConfig>,
}

impl LiveAgentRunner {
    pub fn new(config: Arc<AgentConfig>) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl AgentRunner for LiveAgentRunner {
    async fn run(&self, query: &str, deps: &ResearchDependencies) -> Result<String, AgentError> {
        let agent = ResearchAgent::new(&self.config)?;
        agent.run(query, deps).await
    }
}
