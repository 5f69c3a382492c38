//! OpenAI-compatible chat completions gateway
//!
//! Works against any endpoint speaking the `/chat/completions` protocol
//! (OpenAI, Gemini's compatibility layer, Ollama, vLLM, ...). Tools are sent
//! as function tools and returned tool calls become
//! [`ContentBlock::ToolUse`](parliament_domain::ContentBlock::ToolUse).

pub mod types;

use crate::config::{ConfigError, FileProviderConfig};
use async_trait::async_trait;
use parliament_application::{CompletionRequest, LlmGateway, ProviderError};
use parliament_domain::LlmResponse;
use tracing::{debug, warn};
use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatTool, convert_response,
    convert_status, convert_transport_error,
};

/// [`LlmGateway`] over an OpenAI-compatible HTTP API
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Build from `[provider]` config, reading the key from `api_key_env`.
    ///
    /// An empty `api_key_env` sends no `Authorization` header (local servers).
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, ConfigError> {
        let api_key = if config.api_key_env.is_empty() {
            None
        } else {
            let key = std::env::var(&config.api_key_env).map_err(|_| ConfigError::MissingEnv {
                var: config.api_key_env.clone(),
                purpose: "the LLM provider",
            })?;
            Some(key)
        };

        Ok(Self::new(&config.base_url, &config.model, api_key)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: request.tools.iter().map(ChatTool::from).collect(),
        };

        debug!(
            "POST {} ({} message(s), {} tool(s))",
            self.endpoint(),
            body.messages.len(),
            body.tools.len()
        );

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| convert_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("{} returned {}", self.model, status);
            return Err(convert_status(status.as_u16(), &text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        convert_response(completion)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
