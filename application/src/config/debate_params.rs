//! Debate parameters: orchestrator loop control.
//!
//! [`DebateParams`] groups the static parameters that bound a debate run in
//! [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase).
//! The step limit is the budget guard; the timeouts turn a hung network
//! call into a failed turn instead of a hung debate.

use parliament_domain::ResearchLimits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orchestrator loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    /// Maximum number of steps (agent or moderator turns) for the debate.
    pub step_limit: usize,
    /// Timeout for one LLM completion.
    pub turn_timeout: Option<Duration>,
    /// Timeout for one search call.
    pub tool_timeout: Option<Duration>,
    /// Per-turn research loop limits.
    pub research: ResearchLimits,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            step_limit: 50,
            turn_timeout: Some(Duration::from_secs(120)),
            tool_timeout: Some(Duration::from_secs(30)),
            research: ResearchLimits::default(),
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_max_tool_calls(mut self, max: usize) -> Self {
        self.research.max_tool_calls = max;
        self
    }

    pub fn with_max_consecutive_failures(mut self, max: usize) -> Self {
        self.research.max_consecutive_failures = max;
        self
    }
}
