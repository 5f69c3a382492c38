//! LLM conversation domain.
//!
//! - [`entities::Message`]: a single message sent to a model
//! - [`response::LlmResponse`]: a structured model reply (text and tool use)

pub mod entities;
pub mod response;
