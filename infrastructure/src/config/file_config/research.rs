//! Research configuration from TOML (`[research]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which search backend agents research with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchProvider {
    /// Tavily search API; needs an API key
    #[default]
    Tavily,
    /// DuckDuckGo Instant Answer API; keyless
    #[serde(alias = "ddg")]
    DuckDuckGo,
    /// No search: every turn is a single completion
    None,
}

impl ResearchProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchProvider::Tavily => "tavily",
            ResearchProvider::DuckDuckGo => "duckduckgo",
            ResearchProvider::None => "none",
        }
    }
}

/// Raw research configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResearchConfig {
    pub enabled: bool,
    pub provider: ResearchProvider,
    /// Search calls one turn may make before it must answer
    pub max_tool_calls: usize,
    /// Consecutive failed searches that end a turn's research
    pub max_consecutive_failures: usize,
    /// Hits requested per search
    pub max_results: usize,
    /// Tavily topic ("general" or "news")
    pub topic: String,
    /// Timeout for one search call, `0` disables it
    pub timeout_secs: u64,
    /// Environment variable holding the Tavily API key
    pub api_key_env: String,
    /// Replaces the provider's API URL (proxies, compatible mirrors)
    pub endpoint: Option<String>,
}

impl Default for FileResearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ResearchProvider::default(),
            max_tool_calls: 3,
            max_consecutive_failures: 3,
            max_results: 5,
            topic: "general".to_string(),
            timeout_secs: 30,
            api_key_env: "TAVILY_API_KEY".to_string(),
            endpoint: None,
        }
    }
}

impl FileResearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Whether research is switched on at all
    pub fn is_active(&self) -> bool {
        self.enabled && self.provider != ResearchProvider::None
    }
}
