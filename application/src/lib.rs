//! Application layer for parliament
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DebateParams, FailurePolicy, FailurePolicyKind, RoundOutcome};
pub use ports::{
    event_sink::{CompositeEventSink, EventSink, NoEvents},
    llm_gateway::{CompletionRequest, LlmGateway, ProviderError},
    search_tool::{SearchError, SearchTool},
};
pub use use_cases::execute_round::{DebateState, RoundExecutor, RoundReport};
pub use use_cases::run_debate::{DebateOutcome, RunDebateError, RunDebateInput, RunDebateUseCase};
pub use use_cases::turn_runner::{ResearchStepRecord, TurnOutcome, TurnRunner};
