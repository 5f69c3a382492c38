//! Extracting search requests from model replies

use crate::session::response::LlmResponse;
use crate::tool::entities::{ToolCall, WEB_SEARCH};
use thiserror::Error;

/// A model asked for a tool but the request could not be understood.
///
/// The research loop recovers by treating the reply as a plain completion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolParseError {
    #[error("Tool block is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Tool block has no \"tool\" field")]
    MissingTool,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool call for {0} has no query")]
    MissingQuery(String),

    #[error("Tool block is not closed")]
    Unterminated,
}

/// A validated request to run a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub query: String,
    pub native_id: Option<String>,
}

impl TryFrom<ToolCall> for ToolInvocation {
    type Error = ToolParseError;

    fn try_from(call: ToolCall) -> Result<Self, Self::Error> {
        if !is_search_tool(&call.tool_name) {
            return Err(ToolParseError::UnknownTool(call.tool_name));
        }
        let query = call
            .get_string("query")
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ToolParseError::MissingQuery(call.tool_name.clone()))?
            .to_string();
        Ok(Self {
            query,
            native_id: call.native_id,
        })
    }
}

/// Names models commonly use for the search tool
fn is_search_tool(name: &str) -> bool {
    matches!(name, WEB_SEARCH | "search" | "tavily_search" | "websearch")
}

/// Find the first search request in a reply.
///
/// Native tool-use blocks win over text. `Ok(None)` means the reply is a
/// final answer.
pub fn extract_invocation(response: &LlmResponse) -> Result<Option<ToolInvocation>, ToolParseError> {
    if let Some(call) = response.tool_calls().into_iter().next() {
        return ToolInvocation::try_from(call).map(Some);
    }
    parse_tool_block(&response.text_content())?
        .map(ToolInvocation::try_from)
        .transpose()
}

/// Parse the first fenced `tool` block in `text`:
///
/// ````text
/// ```tool
/// {"tool": "web_search", "args": {"query": "..."}}
/// ```
/// ````
pub fn parse_tool_block(text: &str) -> Result<Option<ToolCall>, ToolParseError> {
    let mut in_tool_block = false;
    let mut current_block = String::new();

    for line in text.lines() {
        if !in_tool_block && line.trim() == "```tool" {
            in_tool_block = true;
            current_block.clear();
        } else if in_tool_block && line.trim() == "```" {
            let parsed: serde_json::Value = serde_json::from_str(&current_block)
                .map_err(|e| ToolParseError::InvalidJson(e.to_string()))?;
            let tool_name = parsed
                .get("tool")
                .and_then(|v| v.as_str())
                .ok_or(ToolParseError::MissingTool)?;

            let mut call = ToolCall::new(tool_name);
            if let Some(args) = parsed.get("args").and_then(|v| v.as_object()) {
                for (key, value) in args {
                    call = call.with_arg(key, value.clone());
                }
            }
            return Ok(Some(call));
        } else if in_tool_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    if in_tool_block {
        return Err(ToolParseError::Unterminated);
    }
    Ok(None)
}

/// Remove fenced `tool` blocks, leaving the surrounding prose
pub fn strip_tool_blocks(text: &str) -> String {
    let mut out = Vec::new();
    let mut in_tool_block = false;
    for line in text.lines() {
        if !in_tool_block && line.trim() == "```tool" {
            in_tool_block = true;
        } else if in_tool_block && line.trim() == "```" {
            in_tool_block = false;
        } else if !in_tool_block {
            out.push(line);
        }
    }
    out.join("\n").trim().to_string()
}
