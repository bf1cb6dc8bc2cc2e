use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::config::LlmConfig;
use bazaar_core::InferenceError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::tools::{ToolCall, ToolDefinition, SEARCH_PRODUCTS};

/// The inference capability: maps user text plus one tool schema to at most one call.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer_call(
        &self,
        system_prompt: &str,
        tool: &ToolDefinition,
        user_text: &str,
    ) -> Result<Option<ToolCall>, InferenceError>;
}

/// Client for any OpenAI-compatible `chat/completions` endpoint
/// (OpenRouter, OpenAI, Ollama).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: f32,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionsClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| InferenceError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    fn request_body(&self, system_prompt: &str, tool: &ToolDefinition, user_text: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_text }
            ],
            "tools": [tool.to_openai_tool_json()],
            "tool_choice": "auto"
        })
    }
}

#[async_trait]
impl InferenceClient for ChatCompletionsClient {
    async fn infer_call(
        &self,
        system_prompt: &str,
        tool: &ToolDefinition,
        user_text: &str,
    ) -> Result<Option<ToolCall>, InferenceError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .header("X-Title", "Bazaar")
            .json(&self.request_body(system_prompt, tool, user_text));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response =
            request.send().await.map_err(|error| InferenceError::Transport(error.to_string()))?;
        let status = response.status();
        let body =
            response.text().await.map_err(|error| InferenceError::Transport(error.to_string()))?;

        if !status.is_success() {
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let payload = serde_json::from_str::<Value>(&body)
            .map_err(|error| InferenceError::MalformedResponse(error.to_string()))?;
        parse_tool_call(&payload)
    }
}

/// Reads the first tool call out of a chat-completions response.
///
/// Models without native tool calling sometimes answer with the arguments as a
/// JSON object in the message text; an object carrying `query` is accepted as
/// a `search_products` call.
pub fn parse_tool_call(payload: &Value) -> Result<Option<ToolCall>, InferenceError> {
    let message = payload
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| {
            InferenceError::MalformedResponse("response has no choices[0].message".to_string())
        })?;

    if let Some(tool_calls) = message.get("tool_calls").and_then(Value::as_array) {
        if tool_calls.len() > 1 {
            warn!(
                event_name = "agent.inference.extra_tool_calls",
                requested = tool_calls.len(),
                "model requested several tool calls; only the first is considered"
            );
        }
        if let Some(first) = tool_calls.first() {
            return read_tool_call(first).map(Some);
        }
    }

    let content = message.get("content").and_then(Value::as_str).unwrap_or_default();
    match extract_json_object(content) {
        Some(arguments) if arguments.get("query").is_some() => {
            debug!(
                event_name = "agent.inference.content_call",
                "using JSON arguments found in message content"
            );
            Ok(Some(ToolCall::new(SEARCH_PRODUCTS, arguments)))
        }
        _ => Ok(None),
    }
}

fn read_tool_call(raw: &Value) -> Result<ToolCall, InferenceError> {
    let function = raw.get("function").ok_or_else(|| {
        InferenceError::MalformedResponse("tool call has no function".to_string())
    })?;
    let tool_name = function.get("name").and_then(Value::as_str).ok_or_else(|| {
        InferenceError::MalformedResponse("tool call has no function name".to_string())
    })?;

    let arguments = match function.get("arguments") {
        None | Some(Value::Null) => json!({}),
        Some(Value::String(raw_arguments)) if raw_arguments.trim().is_empty() => json!({}),
        Some(Value::String(raw_arguments)) => serde_json::from_str(raw_arguments).map_err(
            |error| InferenceError::MalformedResponse(format!("tool arguments: {error}")),
        )?,
        Some(other) => other.clone(),
    };

    Ok(ToolCall {
        id: raw.get("id").and_then(Value::as_str).map(str::to_string),
        tool_name: tool_name.to_string(),
        arguments,
    })
}

/// Finds a JSON object in free text, either in a ```json fence or bare.
fn extract_json_object(text: &str) -> Option<Value> {
    if let Some(fence_start) = text.find("```json") {
        let after_fence = &text[fence_start + "```json".len()..];
        if let Some(fence_end) = after_fence.find("```") {
            if let Ok(value @ Value::Object(_)) =
                serde_json::from_str::<Value>(after_fence[..fence_end].trim())
            {
                return Some(value);
            }
        }
    }

    let trimmed = text.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
