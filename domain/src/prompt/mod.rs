//! Prompt domain
//!
//! Persona rendering and the message templates used for every debate turn.

pub mod persona;
mod template;

pub use persona::{PersonaTemplate, common_directives};
pub use template::PromptTemplate;
