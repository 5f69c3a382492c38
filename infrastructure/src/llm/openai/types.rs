//! Chat Completions wire types and their conversions to domain types
//!
//! Only the fields the debate engine reads are modelled; unknown fields in
//! responses are ignored.

use parliament_application::ProviderError;
use parliament_domain::core::string::truncate;
use parliament_domain::{ContentBlock, LlmResponse, Message, StopReason, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ChatTool<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatTool<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: ChatFunction<'a>,
}

#[derive(Debug, Serialize)]
pub struct ChatFunction<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: serde_json::Value,
}

impl<'a> From<&'a ToolDefinition> for ChatTool<'a> {
    fn from(tool: &'a ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: ChatFunction {
                name: &tool.name,
                description: &tool.description,
                parameters: tool.input_schema(),
            },
        }
    }
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ChatToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    pub function: ChatToolFunction,
}

#[derive(Debug, Deserialize)]
pub struct ChatToolFunction {
    pub name: String,
    /// JSON-encoded arguments, as a string
    #[serde(default)]
    pub arguments: String,
}

/// Convert a completion response to a domain [`LlmResponse`].
///
/// Tool calls whose arguments are not a JSON object get empty arguments;
/// the research loop then reports the missing query to the model.
pub fn convert_response(response: ChatCompletionResponse) -> Result<LlmResponse, ProviderError> {
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(ProviderError::InvalidResponse(
            "response has no choices".to_string(),
        ));
    };

    let mut content = Vec::new();
    if let Some(text) = choice.message.content
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text));
    }
    for call in choice.message.tool_calls {
        let input = match serde_json::from_str::<serde_json::Value>(&call.function.arguments) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        content.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_finish_reason),
        model: response.model,
    })
}

/// Map a non-success HTTP status to a [`ProviderError`].
pub fn convert_status(status: u16, body: &str) -> ProviderError {
    let detail = format!("HTTP {status}: {}", truncate(body, 300));
    match status {
        401 | 403 => ProviderError::MissingCredentials(detail),
        408 | 504 => ProviderError::Timeout,
        429 => ProviderError::RateLimited(detail),
        _ => ProviderError::RequestFailed(detail),
    }
}

/// Map a transport error to a [`ProviderError`].
pub fn convert_transport_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        ProviderError::InvalidResponse(err.to_string())
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}
