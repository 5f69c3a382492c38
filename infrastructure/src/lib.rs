//! Infrastructure layer for parliament
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: LLM gateways, search tools and event encoders, plus
//! configuration file and DebateSpec loading.

pub mod config;
pub mod debate;
pub mod llm;
pub mod logging;
pub mod search;
pub mod wire;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileAgentConfig, FileConfig, FileDebateConfig, FileOutputConfig,
    FileProviderConfig, FileResearchConfig, ResearchProvider,
};
pub use debate::{SpecLoadError, SpecLoader, build_panel, default_panel};
pub use llm::{OfflineGateway, OpenAiGateway};
pub use logging::JsonlEventSink;
pub use search::{DuckDuckGoSearch, TavilySearch, build_search_tool};
pub use wire::{StreamEventSink, WireFormat};
