//! Research subgraph state machine
//!
//! ```text
//!            ┌──────────────── tool requested ───────────────┐
//!            │                                               ▼
//!  ┌──────────────┐                                  ┌──────────────┐
//!  │    REASON    │◀───────── OBSERVE ◀──────────────│  TOOL_CALL   │
//!  └──────┬───────┘                                  └──────────────┘
//!         │ answer / tool budget spent / too many failures
//!         ▼
//!  ┌──────────────┐
//!  │   FINALIZE   │
//!  └──────────────┘
//! ```
//!
//! The machine holds no I/O. The turn runner asks it what to do next, does
//! the work, and reports the outcome back. Both exits that do not come from
//! the model itself are forced finalizations: the runner asks the model for
//! a final answer with the observations gathered so far.

use serde::{Deserialize, Serialize};

/// Limits for one research loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchLimits {
    /// Search calls allowed in a single turn
    pub max_tool_calls: usize,
    /// Consecutive failed searches that force finalization
    pub max_consecutive_failures: usize,
}

impl Default for ResearchLimits {
    fn default() -> Self {
        Self {
            max_tool_calls: 3,
            max_consecutive_failures: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResearchPhase {
    Reason,
    ToolCall,
    Observe,
    Finalize,
}

/// How the loop reached FINALIZE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeReason {
    /// The model answered without requesting a tool
    Answered,
    /// The model wanted another search but the per-turn budget is spent
    ToolBudgetExhausted,
    /// Too many searches in a row failed
    ToolFailures,
}

/// Per-turn loop state
#[derive(Debug, Clone)]
pub struct ResearchLoop {
    limits: ResearchLimits,
    phase: ResearchPhase,
    tool_calls: usize,
    failed_calls: usize,
    consecutive_failures: usize,
    finalize_reason: Option<FinalizeReason>,
}

impl ResearchLoop {
    pub fn new(limits: ResearchLimits) -> Self {
        Self {
            limits,
            phase: ResearchPhase::Reason,
            tool_calls: 0,
            failed_calls: 0,
            consecutive_failures: 0,
            finalize_reason: None,
        }
    }

    pub fn phase(&self) -> ResearchPhase {
        self.phase
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls
    }

    pub fn failed_calls(&self) -> usize {
        self.failed_calls
    }

    pub fn finalize_reason(&self) -> Option<FinalizeReason> {
        self.finalize_reason
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ResearchPhase::Finalize
    }

    /// Whether another search fits in the per-turn budget
    pub fn can_call_tool(&self) -> bool {
        self.tool_calls < self.limits.max_tool_calls
    }

    /// REASON produced a reply. `wants_tool` is true when the reply holds a
    /// valid search request.
    pub fn after_reason(&mut self, wants_tool: bool) -> ResearchPhase {
        debug_assert_eq!(self.phase, ResearchPhase::Reason);
        self.phase = match (wants_tool, self.can_call_tool()) {
            (false, _) => self.finalize(FinalizeReason::Answered),
            (true, false) => self.finalize(FinalizeReason::ToolBudgetExhausted),
            (true, true) => ResearchPhase::ToolCall,
        };
        self.phase
    }

    /// TOOL_CALL finished. A failed search still moves to OBSERVE with an
    /// empty observation.
    pub fn after_tool_call(&mut self, succeeded: bool) -> ResearchPhase {
        debug_assert_eq!(self.phase, ResearchPhase::ToolCall);
        self.tool_calls += 1;
        if succeeded {
            self.consecutive_failures = 0;
        } else {
            self.failed_calls += 1;
            self.consecutive_failures += 1;
        }
        self.phase = ResearchPhase::Observe;
        self.phase
    }

    /// OBSERVE appended its message. Returns to REASON unless the failure
    /// streak forces finalization.
    pub fn after_observe(&mut self) -> ResearchPhase {
        debug_assert_eq!(self.phase, ResearchPhase::Observe);
        self.phase = if self.consecutive_failures >= self.limits.max_consecutive_failures {
            self.finalize(FinalizeReason::ToolFailures)
        } else {
            ResearchPhase::Reason
        };
        self.phase
    }

    fn finalize(&mut self, reason: FinalizeReason) -> ResearchPhase {
        self.finalize_reason = Some(reason);
        ResearchPhase::Finalize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_tool_calls: usize, max_consecutive_failures: usize) -> ResearchLimits {
        ResearchLimits {
            max_tool_calls,
            max_consecutive_failures,
        }
    }

    #[test]
    fn test_direct_answer() {
        let mut research = ResearchLoop::new(ResearchLimits::default());
        assert_eq!(research.phase(), ResearchPhase::Reason);
        assert_eq!(research.after_reason(false), ResearchPhase::Finalize);
        assert_eq!(research.finalize_reason(), Some(FinalizeReason::Answered));
    }

    #[test]
    fn test_search_then_answer() {
        let mut research = ResearchLoop::new(ResearchLimits::default());
        assert_eq!(research.after_reason(true), ResearchPhase::ToolCall);
        assert_eq!(research.after_tool_call(true), ResearchPhase::Observe);
        assert_eq!(research.after_observe(), ResearchPhase::Reason);
        assert_eq!(research.after_reason(false), ResearchPhase::Finalize);
        assert_eq!(research.tool_calls(), 1);
    }

    #[test]
    fn test_tool_budget_forces_finalize() {
        let mut research = ResearchLoop::new(limits(2, 3));
        for _ in 0..2 {
            research.after_reason(true);
            research.after_tool_call(true);
            research.after_observe();
        }
        assert_eq!(research.after_reason(true), ResearchPhase::Finalize);
        assert_eq!(
            research.finalize_reason(),
            Some(FinalizeReason::ToolBudgetExhausted)
        );
        assert_eq!(research.tool_calls(), 2);
    }

    #[test]
    fn test_zero_budget_never_calls_tool() {
        let mut research = ResearchLoop::new(limits(0, 3));
        assert_eq!(research.after_reason(true), ResearchPhase::Finalize);
        assert_eq!(research.tool_calls(), 0);
    }

    #[test]
    fn test_consecutive_failures_force_finalize() {
        let mut research = ResearchLoop::new(limits(10, 3));
        for i in 0..3 {
            research.after_reason(true);
            research.after_tool_call(false);
            let next = research.after_observe();
            if i < 2 {
                assert_eq!(next, ResearchPhase::Reason);
            } else {
                assert_eq!(next, ResearchPhase::Finalize);
            }
        }
        assert_eq!(research.finalize_reason(), Some(FinalizeReason::ToolFailures));
        assert_eq!(research.failed_calls(), 3);
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let mut research = ResearchLoop::new(limits(10, 2));
        research.after_reason(true);
        research.after_tool_call(false);
        research.after_observe();
        research.after_reason(true);
        research.after_tool_call(true);
        research.after_observe();
        research.after_reason(true);
        research.after_tool_call(false);
        assert_eq!(research.after_observe(), ResearchPhase::Reason);
        assert_eq!(research.failed_calls(), 2);
    }
}
