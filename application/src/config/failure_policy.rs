//! Round failure policy.
//!
//! After every round the orchestrator asks the injected [`FailurePolicy`]
//! whether the failed turns of that round should halt the debate. A halt
//! ends the debate in the ERROR state with one terminal error event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Summary of one finished round, as seen by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// 0-based round index
    pub round_index: usize,
    /// Turns attempted in the round
    pub attempted: usize,
    /// Turns that failed
    pub failed: usize,
}

impl RoundOutcome {
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Decides whether a round's partial failure ends the debate.
pub trait FailurePolicy: Send + Sync {
    fn should_halt(&self, outcome: &RoundOutcome) -> bool;

    fn name(&self) -> &'static str;
}

/// Keep going no matter how many turns failed. The default.
pub struct ContinueOnFailure;

impl FailurePolicy for ContinueOnFailure {
    fn should_halt(&self, _outcome: &RoundOutcome) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "continue"
    }
}

/// Halt as soon as any turn fails.
pub struct HaltOnAnyFailure;

impl FailurePolicy for HaltOnAnyFailure {
    fn should_halt(&self, outcome: &RoundOutcome) -> bool {
        outcome.failed > 0
    }

    fn name(&self) -> &'static str {
        "halt_on_any"
    }
}

/// Halt only when every turn of a round failed.
pub struct HaltOnTotalFailure;

impl FailurePolicy for HaltOnTotalFailure {
    fn should_halt(&self, outcome: &RoundOutcome) -> bool {
        outcome.all_failed()
    }

    fn name(&self) -> &'static str {
        "halt_on_total"
    }
}

/// Configurable selection of a built-in policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicyKind {
    #[default]
    Continue,
    HaltOnAny,
    HaltOnTotal,
}

impl FailurePolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicyKind::Continue => "continue",
            FailurePolicyKind::HaltOnAny => "halt_on_any",
            FailurePolicyKind::HaltOnTotal => "halt_on_total",
        }
    }

    pub fn build(self) -> Arc<dyn FailurePolicy> {
        match self {
            FailurePolicyKind::Continue => Arc::new(ContinueOnFailure),
            FailurePolicyKind::HaltOnAny => Arc::new(HaltOnAnyFailure),
            FailurePolicyKind::HaltOnTotal => Arc::new(HaltOnTotalFailure),
        }
    }
}

impl fmt::Display for FailurePolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailurePolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "continue" => Ok(FailurePolicyKind::Continue),
            "halt_on_any" | "halt" => Ok(FailurePolicyKind::HaltOnAny),
            "halt_on_total" => Ok(FailurePolicyKind::HaltOnTotal),
            other => Err(format!(
                "unknown failure policy '{other}' (expected continue, halt_on_any or halt_on_total)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(attempted: usize, failed: usize) -> RoundOutcome {
        RoundOutcome {
            round_index: 0,
            attempted,
            failed,
        }
    }

    #[test]
    fn test_continue_never_halts() {
        assert!(!ContinueOnFailure.should_halt(&outcome(3, 3)));
    }

    #[test]
    fn test_halt_on_any() {
        assert!(!HaltOnAnyFailure.should_halt(&outcome(3, 0)));
        assert!(HaltOnAnyFailure.should_halt(&outcome(3, 1)));
    }

    #[test]
    fn test_halt_on_total() {
        assert!(!HaltOnTotalFailure.should_halt(&outcome(3, 2)));
        assert!(HaltOnTotalFailure.should_halt(&outcome(3, 3)));
        assert!(!HaltOnTotalFailure.should_halt(&outcome(0, 0)));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("continue".parse(), Ok(FailurePolicyKind::Continue));
        assert_eq!("halt-on-any".parse(), Ok(FailurePolicyKind::HaltOnAny));
        assert_eq!("HALT_ON_TOTAL".parse(), Ok(FailurePolicyKind::HaltOnTotal));
        assert!("sometimes".parse::<FailurePolicyKind>().is_err());
    }

    #[test]
    fn test_kind_builds_named_policy() {
        for kind in [
            FailurePolicyKind::Continue,
            FailurePolicyKind::HaltOnAny,
            FailurePolicyKind::HaltOnTotal,
        ] {
            assert_eq!(kind.build().name(), kind.as_str());
        }
    }

    #[test]
    fn test_kind_deserializes_snake_case() {
        let kind: FailurePolicyKind = serde_json::from_str("\"halt_on_any\"").unwrap();
        assert_eq!(kind, FailurePolicyKind::HaltOnAny);
    }
}
