//! Search tool port
//!
//! Optional collaborator. When no search tool is configured the research
//! loop is bypassed and every turn is a single completion.

use async_trait::async_trait;
use parliament_domain::SearchHit;
use thiserror::Error;

/// Errors from a search provider.
///
/// Never fatal: a failed search becomes an empty observation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Transport(String),

    #[error("Search provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode search response: {0}")]
    Decode(String),

    #[error("Search timed out")]
    Timeout,
}

/// A web search provider
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Provider name for logs (e.g., "tavily")
    fn name(&self) -> &str;

    /// Run a query and return hits in ranked order
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}
