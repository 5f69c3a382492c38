//! Search tool adapters and their selection from `[research]` config

pub mod duckduckgo;
pub mod tavily;

pub use duckduckgo::DuckDuckGoSearch;
pub use tavily::TavilySearch;

use crate::config::{FileResearchConfig, ResearchProvider};
use parliament_application::SearchTool;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the configured search tool.
///
/// Returns `None` when research is disabled or Tavily has no API key; the
/// engine then runs every turn as a plain completion.
pub fn build_search_tool(config: &FileResearchConfig) -> Option<Arc<dyn SearchTool>> {
    if !config.is_active() {
        info!("Research disabled");
        return None;
    }

    match config.provider {
        ResearchProvider::Tavily => match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                info!("Research via Tavily (max {} results)", config.max_results);
                let mut tool = TavilySearch::new(key)
                    .with_max_results(config.max_results)
                    .with_topic(&config.topic);
                if let Some(endpoint) = &config.endpoint {
                    tool = tool.with_endpoint(endpoint);
                }
                Some(Arc::new(tool))
            }
            _ => {
                warn!(
                    "{} is not set; agents will answer without web research",
                    config.api_key_env
                );
                None
            }
        },
        ResearchProvider::DuckDuckGo => {
            info!("Research via DuckDuckGo Instant Answers");
            let mut tool = DuckDuckGoSearch::new().with_max_results(config.max_results);
            if let Some(endpoint) = &config.endpoint {
                tool = tool.with_endpoint(endpoint);
            }
            Some(Arc::new(tool))
        }
        ResearchProvider::None => None,
    }
}
