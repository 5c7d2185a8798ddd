//! Client for an OpenAI-compatible chat-completions endpoint with
//! function calling.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::agent::AgentError;
use crate::tools::AgentTool;

/// LLM calls get the long timeout tier: the model may chain several
/// reasoning and tool-selection steps per completion.
const LLM_TIMEOUT: Duration = Duration::from_secs(120);
const LLM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of an error body to keep in messages
const ERROR_BODY_LIMIT: usize = 800;

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
}

/// Function-calling tool definition
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    tool_type: String,
    function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
struct FunctionSpec {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&AgentTool> for ToolSpec {
    fn from(tool: &AgentTool) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        }
    }
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

/// The assistant turn returned by the runtime: final text, tool calls,
/// or both.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl AssistantMessage {
    /// Requested tool calls, empty when the turn is a final answer
    pub fn calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    /// Re-encode this turn as a conversation message so tool results can
    /// be threaded back in the next request.
    pub fn to_message_value(&self) -> Value {
        let mut message = serde_json::json!({"role": "assistant"});
        if let Some(content) = &self.content {
            message["content"] = Value::String(content.clone());
        }
        if let Some(calls) = &self.tool_calls {
            let encoded: Vec<Value> = calls
                .iter()
                .map(|call| {
                    serde_json::json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.function.name,
                            "arguments": call.function.arguments,
                        }
                    })
                })
                .collect();
            message["tool_calls"] = Value::Array(encoded);
        }
        message
    }
}

/// One requested tool invocation
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, exactly as the model produced them
    pub arguments: String,
}

impl FunctionCall {
    /// Parse the argument string; a malformed payload degrades to an
    /// empty object so the tool can answer with guidance instead of the
    /// whole query aborting.
    pub fn parsed_arguments(&self) -> Value {
        serde_json::from_str(&self.arguments)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Minimal chat-completions client used by the research agent
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(LLM_TIMEOUT)
            .connect_timeout(LLM_CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion over the conversation so far.
    pub async fn complete(
        &self,
        messages: &[Value],
        tools: &[ToolSpec],
    ) -> Result<AssistantMessage, AgentError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout
                } else {
                    AgentError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(AgentError::Api {
                status: status.as_u16(),
                message: detail,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AgentError::Parse("chat completion had no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_final_answer() {
        let body = r#"{"choices": [{"message": {"content": "ANSWER"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let message = &response.choices[0].message;
        assert_eq!(message.content.as_deref(), Some("ANSWER"));
        assert!(message.calls().is_empty());
    }

    #[test]
    fn test_parses_tool_calls() {
        let body = r#"{
            "choices": [{"message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "search_knowledge_base", "arguments": "{\"query\": \"q\"}"}
                }]
            }}]
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let message = &response.choices[0].message;
        let calls = message.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "search_knowledge_base");
        assert_eq!(calls[0].function.parsed_arguments()["query"], "q");
    }

    #[test]
    fn test_malformed_arguments_degrade_to_empty_object() {
        let call = FunctionCall {
            name: "search_knowledge_base".to_string(),
            arguments: "{not json".to_string(),
        };
        assert_eq!(
            call.parsed_arguments(),
            Value::Object(serde_json::Map::new())
        );
    }

    #[test]
    fn test_round_trips_assistant_turn() {
        let message = AssistantMessage {
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                function: FunctionCall {
                    name: "list_sources".to_string(),
                    arguments: "{}".to_string(),
                },
            }]),
        };

        let value = message.to_message_value();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["tool_calls"][0]["id"], "call_1");
        assert_eq!(value["tool_calls"][0]["function"]["name"], "list_sources");
    }
}
