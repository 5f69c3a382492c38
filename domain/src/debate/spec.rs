//! Declarative debate specification
//!
//! A [`DebateSpec`] is the single source of truth for round order, round
//! kinds, context strategies and prompt templates. It is validated eagerly
//! on construction and immutable afterwards: a "hot" configuration change
//! means building a fresh spec, never editing one in place.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a [`DebateSpec`]
///
/// All variants are fatal and surface before a debate starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Debate spec must declare at least one round")]
    NoRounds,

    #[error("Round {round}: unknown round kind '{value}' (expected parallel, sequential or moderator)")]
    UnknownKind { round: usize, value: String },

    #[error(
        "Round {round}: unknown context strategy '{value}' (expected topic_only or full_transcript)"
    )]
    UnknownContextStrategy { round: usize, value: String },

    #[error("Round {round}: title cannot be empty")]
    EmptyTitle { round: usize },

    #[error("Round {round}: index {index} does not match its position")]
    IndexMismatch { round: usize, index: usize },

    #[error("Round {round}: moderator rounds must come after every panel round")]
    ModeratorNotLast { round: usize },
}

/// How a round addresses the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    /// Every agent answers independently from the same pre-round snapshot
    Parallel,
    /// Agents speak in panel order, each seeing earlier turns of the round
    Sequential,
    /// A single moderator turn synthesizes the full transcript
    Moderator,
}

impl RoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundKind::Parallel => "parallel",
            RoundKind::Sequential => "sequential",
            RoundKind::Moderator => "moderator",
        }
    }
}

impl std::fmt::Display for RoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(RoundKind::Parallel),
            "sequential" => Ok(RoundKind::Sequential),
            "moderator" => Ok(RoundKind::Moderator),
            other => Err(other.to_string()),
        }
    }
}

/// What prior transcript content an agent sees when its prompt is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategy {
    TopicOnly,
    FullTranscript,
}

impl ContextStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextStrategy::TopicOnly => "topic_only",
            ContextStrategy::FullTranscript => "full_transcript",
        }
    }
}

impl std::fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContextStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topic_only" => Ok(ContextStrategy::TopicOnly),
            "full_transcript" => Ok(ContextStrategy::FullTranscript),
            other => Err(other.to_string()),
        }
    }
}

/// One validated round of a debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDef {
    /// 0-based position in the spec
    pub index: usize,
    pub title: String,
    pub kind: RoundKind,
    pub context_strategy: ContextStrategy,
    pub prompt_template: String,
}

impl RoundDef {
    pub fn new(
        index: usize,
        title: impl Into<String>,
        kind: RoundKind,
        context_strategy: ContextStrategy,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            index,
            title: title.into(),
            kind,
            context_strategy,
            prompt_template: prompt_template.into(),
        }
    }

    /// 1-based round number shown to humans and carried in events
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// The strategy actually used when building prompts.
    ///
    /// Moderator rounds always read the full transcript, whatever the spec says.
    pub fn effective_context_strategy(&self) -> ContextStrategy {
        match self.kind {
            RoundKind::Moderator => ContextStrategy::FullTranscript,
            _ => self.context_strategy,
        }
    }

    /// Budget steps this round consumes for a panel of `panel_size` agents
    pub fn steps(&self, panel_size: usize) -> usize {
        match self.kind {
            RoundKind::Parallel | RoundKind::Sequential => panel_size,
            RoundKind::Moderator => 1,
        }
    }
}

/// Unvalidated round as read from a declarative source
///
/// Kind and context strategy stay raw strings so that unknown values are
/// reported as [`SpecError`]s with the offending round attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDraft {
    pub title: String,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default = "default_context_strategy")]
    pub context_strategy: String,
    #[serde(default)]
    pub prompt_template: String,
}

fn default_context_strategy() -> String {
    ContextStrategy::FullTranscript.as_str().to_string()
}

/// Validated, immutable, ordered list of rounds
///
/// Cloning is cheap: rounds are shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateSpec {
    rounds: Arc<[RoundDef]>,
}

impl DebateSpec {
    /// Validate and wrap a list of rounds.
    ///
    /// Fails when the list is empty, a title is blank, an index disagrees
    /// with its position, or a moderator round is followed by a panel round.
    pub fn new(rounds: Vec<RoundDef>) -> Result<Self, SpecError> {
        if rounds.is_empty() {
            return Err(SpecError::NoRounds);
        }

        let mut first_moderator: Option<usize> = None;
        for (position, round) in rounds.iter().enumerate() {
            let number = position + 1;
            if round.index != position {
                return Err(SpecError::IndexMismatch {
                    round: number,
                    index: round.index,
                });
            }
            if round.title.trim().is_empty() {
                return Err(SpecError::EmptyTitle { round: number });
            }
            match (round.kind, first_moderator) {
                (RoundKind::Moderator, None) => first_moderator = Some(number),
                (RoundKind::Parallel | RoundKind::Sequential, Some(moderator)) => {
                    return Err(SpecError::ModeratorNotLast { round: moderator });
                }
                _ => {}
            }
        }

        Ok(Self {
            rounds: rounds.into(),
        })
    }

    /// Parse raw drafts into rounds (indexed by position) and validate them
    pub fn from_drafts(drafts: Vec<RoundDraft>) -> Result<Self, SpecError> {
        let rounds = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let kind = draft
                    .kind
                    .parse::<RoundKind>()
                    .map_err(|value| SpecError::UnknownKind {
                        round: index + 1,
                        value,
                    })?;
                let context_strategy = draft.context_strategy.parse::<ContextStrategy>().map_err(
                    |value| SpecError::UnknownContextStrategy {
                        round: index + 1,
                        value,
                    },
                )?;
                Ok(RoundDef::new(
                    index,
                    draft.title,
                    kind,
                    context_strategy,
                    draft.prompt_template,
                ))
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        Self::new(rounds)
    }

    pub fn rounds(&self) -> &[RoundDef] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&RoundDef> {
        self.rounds.get(index)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Always false for a constructed spec; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Total budget steps needed to run every round once
    pub fn total_steps(&self, panel_size: usize) -> usize {
        self.rounds.iter().map(|r| r.steps(panel_size)).sum()
    }

    /// Step cost of the most expensive single round
    pub fn max_round_steps(&self, panel_size: usize) -> usize {
        self.rounds
            .iter()
            .map(|r| r.steps(panel_size))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, kind: &str, strategy: &str) -> RoundDraft {
        RoundDraft {
            title: title.to_string(),
            kind: kind.to_string(),
            context_strategy: strategy.to_string(),
            prompt_template: format!("{title} prompt"),
        }
    }

    fn standard_drafts() -> Vec<RoundDraft> {
        vec![
            draft("Opening", "parallel", "topic_only"),
            draft("Rebuttal", "sequential", "full_transcript"),
            draft("Synthesis", "moderator", "full_transcript"),
        ]
    }

    #[test]
    fn test_from_drafts_assigns_indexes_in_order() {
        let spec = DebateSpec::from_drafts(standard_drafts()).unwrap();
        assert_eq!(spec.len(), 3);
        let titles: Vec<_> = spec.rounds().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Opening", "Rebuttal", "Synthesis"]);
        for (i, round) in spec.rounds().iter().enumerate() {
            assert_eq!(round.index, i);
            assert_eq!(round.number(), i + 1);
        }
        assert_eq!(spec.round(1).unwrap().kind, RoundKind::Sequential);
    }

    #[test]
    fn test_empty_spec_rejected() {
        assert_eq!(DebateSpec::from_drafts(vec![]), Err(SpecError::NoRounds));
        assert_eq!(DebateSpec::new(vec![]), Err(SpecError::NoRounds));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = DebateSpec::from_drafts(vec![
            draft("Opening", "parallel", "topic_only"),
            draft("Bad", "round-robin", "topic_only"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SpecError::UnknownKind {
                round: 2,
                value: "round-robin".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_context_strategy_rejected() {
        let err =
            DebateSpec::from_drafts(vec![draft("Opening", "parallel", "last_k")]).unwrap_err();
        assert!(matches!(
            err,
            SpecError::UnknownContextStrategy { round: 1, .. }
        ));
    }

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!("Parallel".parse::<RoundKind>(), Ok(RoundKind::Parallel));
        assert_eq!(" MODERATOR ".parse::<RoundKind>(), Ok(RoundKind::Moderator));
        assert_eq!(
            "Full_Transcript".parse::<ContextStrategy>(),
            Ok(ContextStrategy::FullTranscript)
        );
    }

    #[test]
    fn test_moderator_must_be_trailing() {
        let err = DebateSpec::from_drafts(vec![
            draft("Opening", "parallel", "topic_only"),
            draft("Synthesis", "moderator", "full_transcript"),
            draft("Rebuttal", "sequential", "full_transcript"),
        ])
        .unwrap_err();
        assert_eq!(err, SpecError::ModeratorNotLast { round: 2 });
    }

    #[test]
    fn test_chained_trailing_moderators_allowed() {
        let spec = DebateSpec::from_drafts(vec![
            draft("Opening", "parallel", "topic_only"),
            draft("Summary", "moderator", "full_transcript"),
            draft("Verdict", "moderator", "full_transcript"),
        ]);
        assert!(spec.is_ok());
    }

    #[test]
    fn test_moderator_only_spec_allowed() {
        assert!(DebateSpec::from_drafts(vec![draft("Synthesis", "moderator", "topic_only")]).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = DebateSpec::from_drafts(vec![draft("  ", "parallel", "topic_only")]).unwrap_err();
        assert_eq!(err, SpecError::EmptyTitle { round: 1 });
    }

    #[test]
    fn test_index_mismatch_rejected() {
        let rounds = vec![RoundDef::new(
            3,
            "Opening",
            RoundKind::Parallel,
            ContextStrategy::TopicOnly,
            "",
        )];
        assert_eq!(
            DebateSpec::new(rounds),
            Err(SpecError::IndexMismatch { round: 1, index: 3 })
        );
    }

    #[test]
    fn test_moderator_always_reads_full_transcript() {
        let round = RoundDef::new(
            0,
            "Synthesis",
            RoundKind::Moderator,
            ContextStrategy::TopicOnly,
            "",
        );
        assert_eq!(
            round.effective_context_strategy(),
            ContextStrategy::FullTranscript
        );

        let opening = RoundDef::new(
            0,
            "Opening",
            RoundKind::Parallel,
            ContextStrategy::TopicOnly,
            "",
        );
        assert_eq!(
            opening.effective_context_strategy(),
            ContextStrategy::TopicOnly
        );
    }

    #[test]
    fn test_step_accounting() {
        let spec = DebateSpec::from_drafts(standard_drafts()).unwrap();
        // 2 (parallel) + 2 (sequential) + 1 (moderator)
        assert_eq!(spec.total_steps(2), 5);
        assert_eq!(spec.max_round_steps(2), 2);
        assert_eq!(spec.total_steps(4), 9);
    }

    #[test]
    fn test_clone_shares_rounds() {
        let spec = DebateSpec::from_drafts(standard_drafts()).unwrap();
        let copy = spec.clone();
        assert_eq!(spec, copy);
        assert!(std::ptr::eq(spec.rounds(), copy.rounds()));
    }
}
