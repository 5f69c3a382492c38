//! Domain layer for parliament
//!
//! This crate contains the core debate model: entities, value objects and
//! the pure state machines the application layer drives. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! A debate poses a [`Topic`] to a [`Panel`] of agents and runs the rounds of
//! a [`DebateSpec`] in order:
//!
//! - **Parallel** rounds: every agent answers the same pre-round context
//! - **Sequential** rounds: agents speak in panel order and see earlier turns
//! - **Moderator** rounds: one synthesis turn over the full transcript
//!
//! Every turn lands in the append-only [`Transcript`] and every attempted
//! turn costs one step of the [`BudgetState`].
//!
//! ## Research
//!
//! With a search tool configured, an agent turn runs as a bounded
//! [`ResearchLoop`] (reason → search → observe) before it is finalized,
//! citing the hits it relies on.

pub mod agent;
pub mod config;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod research;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{Agent, AgentId, DEFAULT_ROLE, Panel};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, topic::Topic};
pub use debate::{
    AgentDisplay, BudgetExceeded, BudgetState, ContextStrategy, DebateEvent, DebateSpec,
    EndReason, RoundDef, RoundDraft, RoundKind, Speaker, SpecError, StatusCode, Transcript,
    TranscriptError, Turn, TurnStatus, render_context,
};
pub use prompt::{PersonaTemplate, PromptTemplate};
pub use research::{
    Citation, CitationLedger, FinalizeReason, ResearchLimits, ResearchLoop, ResearchPhase,
    SearchHit, ToolInvocation, ToolParseError, extract_invocation,
};
pub use session::{
    entities::{Message, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{ToolCall, ToolDefinition, ToolParameter, WEB_SEARCH};
