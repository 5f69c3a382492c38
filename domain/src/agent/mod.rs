//! Agent domain module
//!
//! Contains debate personas and the panel that groups them.

pub mod entities;
pub mod panel;

pub use entities::{Agent, AgentId, DEFAULT_ROLE};
pub use panel::Panel;
