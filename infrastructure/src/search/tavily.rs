//! Tavily search API
//!
//! `POST https://api.tavily.com/search` with a bearer key; results carry
//! `title`, `url` and `content`.

use async_trait::async_trait;
use parliament_application::{SearchError, SearchTool};
use parliament_domain::SearchHit;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// [`SearchTool`] backed by Tavily
#[derive(Debug, Clone)]
pub struct TavilySearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
    topic: String,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: TAVILY_API_URL.to_string(),
            api_key: api_key.into(),
            max_results: 5,
            topic: "general".to_string(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn convert_results(response: TavilyResponse, max_results: usize) -> Vec<SearchHit> {
    response
        .results
        .into_iter()
        .filter(|r| !r.url.is_empty())
        .take(max_results)
        .map(|r| SearchHit::new(r.title, r.url, r.content))
        .collect()
}

#[async_trait]
impl SearchTool for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let body = TavilyRequest {
            query,
            max_results: self.max_results,
            topic: &self.topic,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
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

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        let hits = convert_results(parsed, self.max_results);
        debug!("Tavily returned {} hit(s) for {:?}", hits.len(), query);
        Ok(hits)
    }
}
