//! LLM gateway adapters

pub mod offline;
pub mod openai;

pub use offline::OfflineGateway;
pub use openai::OpenAiGateway;
