//! LLM Gateway port
//!
//! Defines the interface for requesting completions from an LLM provider.

use async_trait::async_trait;
use parliament_domain::{LlmResponse, Message, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// Recoverable at turn granularity: the round executor records a failed
/// turn and the debate moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    /// Tools the model may call; empty for a plain completion
    pub tools: Vec<ToolDefinition>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Concatenated message text, used by deterministic stand-ins and logs
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("[{}]\n{}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer. A reply is
/// either text or a tool invocation, both carried by [`LlmResponse`].
/// Gateways without native tool use ignore `request.tools` and return text;
/// the research loop then reads fenced tool blocks from that text.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Request one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}
