//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DebateParams`]: orchestrator loop control (step limit, timeouts, research limits)
//! - [`FailurePolicy`]: whether a round's failed turns halt the debate

pub mod debate_params;
pub mod failure_policy;

pub use debate_params::DebateParams;
pub use failure_policy::{
    ContinueOnFailure, FailurePolicy, FailurePolicyKind, HaltOnAnyFailure, HaltOnTotalFailure,
    RoundOutcome,
};
