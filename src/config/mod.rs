//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder value that marks a credential as not actually configured.
///
/// Deployment templates ship this literal so operators notice the key still
/// needs rotating; it must be treated the same as an unset variable.
pub const PLACEHOLDER_KEY: &str = "ROTATE_ME";

/// Default model used when no override is configured.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the knowledge-item search, code-example search, and
    /// source catalog services. The MCP tools also forward research queries
    /// to `{api_url}/api/research/query`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Upstream LLM credential. `None` or the placeholder value means the
    /// research endpoint reports itself unavailable.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Model name passed to the LLM runtime.
    #[serde(default = "default_model")]
    pub model: String,

    /// Attempts per LLM call (transient failures only).
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Listen address for the REST API server.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("RESEARCH_AGENT_API_URL").unwrap_or_else(|_| default_api_url()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("RESEARCH_AGENT_OPENAI_BASE_URL")
                .unwrap_or_else(|_| default_openai_base_url()),
            model: std::env::var("RESEARCH_AGENT_MODEL").unwrap_or_else(|_| default_model()),
            retries: default_retries(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AgentConfig {
    /// Whether a usable (non-placeholder) LLM credential is present.
    pub fn openai_key_configured(&self) -> bool {
        matches!(
            self.openai_api_key.as_deref(),
            Some(key) if !key.is_empty() && key != PLACEHOLDER_KEY
        )
    }

    /// Whether the agent stack can be assembled from this configuration:
    /// the model name must be set and both base URLs must parse.
    pub fn agent_ready(&self) -> bool {
        !self.model.is_empty()
            && url::Url::parse(&self.api_url).is_ok()
            && url::Url::parse(&self.openai_base_url).is_ok()
    }
}

fn default_api_url() -> String {
    "http://localhost:8181".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_retries() -> u32 {
    3
}

fn default_bind_addr() -> String {
    "0.0.0.0:8181".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<AgentConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("RESEARCH_AGENT"))
        .build()?;

    let mut config: AgentConfig = settings.try_deserialize()?;

    // The credential keeps its conventional variable name regardless of
    // where the rest of the configuration came from
    if config.openai_api_key.is_none() {
        config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
    }

    Ok(config)
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> AgentConfig {
    AgentConfig::default()
}

/// Look for a config file in the conventional locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("research-agent.toml");
    if local.is_file() {
        return Some(local);
    }

    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok()?;

    let user = config_home.join("research-agent").join("config.toml");
    user.is_file().then_some(user)
}
