//! Transcript: the append-only record of a debate
//!
//! The transcript is the only state shared by every round. Turns are never
//! mutated after they are appended, and `(round_index, sequence)` strictly
//! increases along the list.

use crate::agent::{Agent, AgentId};
use crate::research::Citation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MODERATOR_NAME: &str = "Moderator";
pub const MODERATOR_ROLE: &str = "moderator";
pub const MODERATOR_COLOR: &str = "#6B7280";
pub const MODERATOR_ICON: &str = "🎤";

/// Errors raised by [`Transcript::append`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Cannot append a round {attempted} turn after round {current}")]
    RoundRegression { current: usize, attempted: usize },
}

/// Who produced a turn
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Agent(AgentId),
    Moderator,
}

impl Speaker {
    pub fn is_moderator(&self) -> bool {
        matches!(self, Speaker::Moderator)
    }

    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            Speaker::Agent(id) => Some(id),
            Speaker::Moderator => None,
        }
    }
}

/// Whether the turn carries a real contribution or marks a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Completed,
    /// The agent call failed; `content` holds the error description
    Failed,
}

/// A single contribution within a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub round_index: usize,
    /// Position within the round; assigned by [`Transcript::append`]
    pub sequence: usize,
    pub speaker: Speaker,
    pub speaker_name: String,
    pub role: String,
    pub color: String,
    pub icon: String,
    pub content: String,
    pub status: TurnStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// A completed turn spoken by a panel agent
    pub fn from_agent(round_index: usize, agent: &Agent, content: impl Into<String>) -> Self {
        Self {
            round_index,
            sequence: 0,
            speaker: Speaker::Agent(agent.id.clone()),
            speaker_name: agent.name.clone(),
            role: agent.role.clone(),
            color: agent.color.clone(),
            icon: agent.icon.clone(),
            content: content.into(),
            status: TurnStatus::Completed,
            citations: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// A completed synthesis turn from the moderator
    pub fn from_moderator(round_index: usize, content: impl Into<String>) -> Self {
        Self {
            round_index,
            sequence: 0,
            speaker: Speaker::Moderator,
            speaker_name: MODERATOR_NAME.to_string(),
            role: MODERATOR_ROLE.to_string(),
            color: MODERATOR_COLOR.to_string(),
            icon: MODERATOR_ICON.to_string(),
            content: content.into(),
            status: TurnStatus::Completed,
            citations: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Mark this turn as a failed attempt, replacing its content with the error
    pub fn into_failed(mut self, error: impl Into<String>) -> Self {
        self.status = TurnStatus::Failed;
        self.content = error.into();
        self.citations.clear();
        self
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == TurnStatus::Failed
    }

    /// 1-based round number
    pub fn round_number(&self) -> usize {
        self.round_index + 1
    }
}

/// Append-only ordered sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, assigning its within-round sequence number.
    ///
    /// Rejects turns whose round precedes the last appended round.
    pub fn append(&mut self, mut turn: Turn) -> Result<&Turn, TranscriptError> {
        turn.sequence = match self.turns.last() {
            Some(last) if turn.round_index < last.round_index => {
                return Err(TranscriptError::RoundRegression {
                    current: last.round_index,
                    attempted: turn.round_index,
                });
            }
            Some(last) if turn.round_index == last.round_index => last.sequence + 1,
            _ => 0,
        };
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Turns belonging to one round, in append order
    pub fn round_turns(&self, round_index: usize) -> impl Iterator<Item = &Turn> {
        self.turns
            .iter()
            .filter(move |t| t.round_index == round_index)
    }

    /// Turns that completed successfully
    pub fn completed(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| !t.is_failed())
    }

    /// Number of failed turns
    pub fn failure_count(&self) -> usize {
        self.turns.iter().filter(|t| t.is_failed()).count()
    }
}
