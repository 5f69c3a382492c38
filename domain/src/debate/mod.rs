//! Debate domain: round specs, transcript, budget, events and context

pub mod budget;
pub mod context;
pub mod event;
pub mod spec;
pub mod transcript;

pub use budget::{BudgetExceeded, BudgetState};
pub use context::render_context;
pub use event::{AgentDisplay, DebateEvent, EndReason, StatusCode};
pub use spec::{ContextStrategy, DebateSpec, RoundDef, RoundDraft, RoundKind, SpecError};
pub use transcript::{Speaker, Transcript, TranscriptError, Turn, TurnStatus};
