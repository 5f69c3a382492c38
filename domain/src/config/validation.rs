//! Validation of a debate setup before it runs.
//!
//! Checks the combination of [`DebateSpec`] × panel size × step limit and
//! returns structured issues with severity levels. Nothing here rejects a
//! spec on its own; [`DebateSpec::new`] already did that.
//!
//! # Examples
//!
//! ```
//! use parliament_domain::config::validation::{has_errors, validate_debate_setup};
//! use parliament_domain::debate::{ContextStrategy, DebateSpec, RoundDef, RoundKind};
//!
//! let spec = DebateSpec::new(vec![RoundDef::new(
//!     0, "Opening", RoundKind::Parallel, ContextStrategy::TopicOnly, "",
//! )]).unwrap();
//! let issues = validate_debate_setup(&spec, 3, 10);
//! assert!(!has_errors(&issues));
//! ```

use crate::debate::spec::{ContextStrategy, DebateSpec, RoundKind};

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the debate cannot run as configured.
    Error,
    /// Non-fatal: the debate runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The step limit cannot cover even one full round.
    StepLimitBelowRound,
    /// The step limit covers some rounds but not the whole debate.
    StepLimitBelowDebate,
    /// A one-agent panel: sequential rounds have nobody to react to.
    SinglePanelist,
    /// A moderator round asks for `topic_only`; it will read the full transcript.
    ModeratorTopicOnly,
    /// A configured value is out of range or unusable.
    InvalidValue,
    /// A custom agent declares neither a system prompt nor a persona.
    IncompleteAgent,
}

/// A detected issue in the debate setup.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

/// Validate a spec against the panel it will run with and the step limit.
///
/// Returns a list of issues. An empty list means the setup is sound.
pub fn validate_debate_setup(
    spec: &DebateSpec,
    panel_size: usize,
    step_limit: usize,
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    let largest_round = spec.max_round_steps(panel_size);
    let required = spec.total_steps(panel_size);
    if step_limit < largest_round {
        issues.push(ConfigIssue {
            severity: Severity::Error,
            code: ConfigIssueCode::StepLimitBelowRound,
            message: format!(
                "step limit {step_limit} is below the {largest_round} steps one full round \
                 needs with {panel_size} agent(s)"
            ),
        });
    } else if step_limit < required {
        issues.push(ConfigIssue {
            severity: Severity::Warning,
            code: ConfigIssueCode::StepLimitBelowDebate,
            message: format!(
                "step limit {step_limit} is below the {required} steps the whole debate \
                 needs; it will stop with a budget error"
            ),
        });
    }

    if panel_size == 1 {
        issues.push(ConfigIssue {
            severity: Severity::Warning,
            code: ConfigIssueCode::SinglePanelist,
            message: "panel has a single agent; rebuttal rounds will have nothing to rebut"
                .to_string(),
        });
    }

    for round in spec.rounds() {
        if round.kind == RoundKind::Moderator
            && round.context_strategy == ContextStrategy::TopicOnly
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::ModeratorTopicOnly,
                message: format!(
                    "round {} ('{}') is a moderator round with topic_only context; \
                     it will read the full transcript",
                    round.number(),
                    round.title
                ),
            });
        }
    }

    issues
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
