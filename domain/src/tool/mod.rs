//! Tool domain module
//!
//! Agents get exactly one tool, `web_search`, and only while a search
//! provider is configured. A model may request it in two ways:
//!
//! ```text
//! Native tool use:  LlmResponse { ContentBlock::ToolUse { .. } } → ToolCall
//! Prompt based:     fenced `tool` block {"tool": "web_search", "args": {..}} → ToolCall
//! ```
//!
//! Either way the request ends up as a [`ToolCall`]; the research loop then
//! narrows it to a search query.

pub mod entities;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, WEB_SEARCH};
