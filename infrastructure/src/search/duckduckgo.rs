//! DuckDuckGo Instant Answer API
//!
//! Keyless. Returns abstracts, definitions and related topics rather than a
//! full result listing, so hit counts are small and often zero.

use async_trait::async_trait;
use parliament_application::{SearchError, SearchTool};
use parliament_domain::SearchHit;
use tracing::debug;

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// [`SearchTool`] backed by the DuckDuckGo Instant Answer API
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DDG_API_URL.to_string(),
            max_results: 5,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract hits from an Instant Answer payload.
///
/// Order: abstract, answer, definition, then flat related topics. Nested
/// topic groups are skipped.
fn extract_hits(data: &serde_json::Value, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if let Some(abstract_text) = data["AbstractText"].as_str()
        && !abstract_text.is_empty()
    {
        let source = data["AbstractSource"].as_str().unwrap_or("DuckDuckGo");
        let url = data["AbstractURL"].as_str().unwrap_or_default();
        hits.push(SearchHit::new(source, url, abstract_text));
    }

    if let Some(answer) = data["Answer"].as_str()
        && !answer.is_empty()
    {
        let url = data["AnswerURL"].as_str().unwrap_or_default();
        hits.push(SearchHit::new("Instant Answer", url, answer));
    }

    if let Some(definition) = data["Definition"].as_str()
        && !definition.is_empty()
    {
        let source = data["DefinitionSource"].as_str().unwrap_or("Definition");
        let url = data["DefinitionURL"].as_str().unwrap_or_default();
        hits.push(SearchHit::new(source, url, definition));
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        hits.extend(topics.iter().filter_map(|t| {
            let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
            let url = t["FirstURL"].as_str().unwrap_or_default();
            // "Title - description" is the usual shape
            let title = text.split(" - ").next().unwrap_or(text);
            Some(SearchHit::new(title, url, text))
        }));
    }

    hits.truncate(max_results);
    hits
}

#[async_trait]
impl SearchTool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .header("User-Agent", concat!("parliament/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        let hits = extract_hits(&body, self.max_results);
        debug!("DuckDuckGo returned {} hit(s) for {:?}", hits.len(), query);
        Ok(hits)
    }
}
