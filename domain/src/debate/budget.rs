//! Step budget for a debate
//!
//! One step is one attempted agent turn or moderator turn. The budget is
//! checked before a step is attempted, so a debate either runs every step it
//! needs or stops with [`BudgetExceeded`]; it is never silently truncated.

use super::spec::DebateSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower clamp for [`BudgetState::recommended_limit`]
pub const MIN_RECOMMENDED_LIMIT: usize = 25;
/// Upper clamp for [`BudgetState::recommended_limit`]
pub const MAX_RECOMMENDED_LIMIT: usize = 100;

/// Attempting `requested` more steps would pass the step limit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Step budget exceeded: {requested} more step(s) requested with {steps_taken}/{step_limit} already used"
)]
pub struct BudgetExceeded {
    pub steps_taken: usize,
    pub step_limit: usize,
    pub requested: usize,
}

/// Steps consumed so far against the configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetState {
    pub steps_taken: usize,
    pub step_limit: usize,
    /// Search calls issued by research loops. Reported only; not charged
    /// against `step_limit`.
    pub tool_calls: usize,
}

impl BudgetState {
    pub fn new(step_limit: usize) -> Self {
        Self {
            steps_taken: 0,
            step_limit,
            tool_calls: 0,
        }
    }

    /// Check that `steps` more steps fit, then charge them.
    ///
    /// On failure nothing is charged.
    pub fn try_consume(&mut self, steps: usize) -> Result<(), BudgetExceeded> {
        self.ensure(steps)?;
        self.steps_taken += steps;
        Ok(())
    }

    /// Check that `steps` more steps fit without charging them.
    pub fn ensure(&self, steps: usize) -> Result<(), BudgetExceeded> {
        if self.can_consume(steps) {
            Ok(())
        } else {
            Err(BudgetExceeded {
                steps_taken: self.steps_taken,
                step_limit: self.step_limit,
                requested: steps,
            })
        }
    }

    pub fn can_consume(&self, steps: usize) -> bool {
        self.steps_taken
            .checked_add(steps)
            .is_some_and(|total| total <= self.step_limit)
    }

    pub fn remaining(&self) -> usize {
        self.step_limit.saturating_sub(self.steps_taken)
    }

    pub fn record_tool_calls(&mut self, count: usize) {
        self.tool_calls += count;
    }

    /// Step limit to use when none is configured: the debate's required
    /// steps plus 30% headroom, clamped to a sane range but never below what
    /// the debate needs.
    pub fn recommended_limit(spec: &DebateSpec, panel_size: usize) -> usize {
        let required = spec.total_steps(panel_size);
        let padded = (required * 13).div_ceil(10);
        padded
            .clamp(MIN_RECOMMENDED_LIMIT, MAX_RECOMMENDED_LIMIT)
            .max(required)
    }
}
