//! LLM provider configuration from TOML (`[provider]` section)
//!
//! Any OpenAI-compatible chat completions endpoint works. The defaults point
//! at Gemini's compatibility endpoint.

use serde::{Deserialize, Serialize};

/// Raw provider configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}
