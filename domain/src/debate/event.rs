//! Events emitted while a debate runs
//!
//! Events are transient: they are handed to a sink in order and never stored
//! by the engine. Each one carries enough metadata to update a UI without
//! looking anything up. The serialized form is an object tagged by `type`;
//! consumers must ignore fields they do not know.

use super::spec::{RoundDef, RoundKind};
use super::transcript::{
    MODERATOR_COLOR, MODERATOR_ICON, MODERATOR_NAME, MODERATOR_ROLE, Speaker, Turn,
};
use crate::agent::Agent;
use crate::research::Citation;
use serde::{Deserialize, Serialize};

/// Status codes carried by [`DebateEvent::StatusUpdate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    RoundStarting,
    AgentTurnStarting,
    Synthesis,
    End,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::RoundStarting => "ROUND_STARTING",
            StatusCode::AgentTurnStarting => "AGENT_TURN_STARTING",
            StatusCode::Synthesis => "SYNTHESIS",
            StatusCode::End => "END",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display identity of a speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDisplay {
    pub id: String,
    pub name: String,
    pub role: String,
    pub color: String,
    pub icon: String,
}

impl AgentDisplay {
    pub fn moderator() -> Self {
        Self {
            id: MODERATOR_ROLE.to_string(),
            name: MODERATOR_NAME.to_string(),
            role: MODERATOR_ROLE.to_string(),
            color: MODERATOR_COLOR.to_string(),
            icon: MODERATOR_ICON.to_string(),
        }
    }
}

impl From<&Agent> for AgentDisplay {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name.clone(),
            role: agent.role.clone(),
            color: agent.color.clone(),
            icon: agent.icon.clone(),
        }
    }
}

/// Why a debate reached END
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Completed,
    Cancelled,
}

/// A single event in the debate stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebateEvent {
    StatusUpdate {
        code: StatusCode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round_number: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round_title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round_type: Option<RoundKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<AgentDisplay>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<EndReason>,
    },
    AgentResponse {
        /// Display name of the speaker
        agent: String,
        agent_id: String,
        role: String,
        content: String,
        /// 1-based round number
        round: usize,
        color: String,
        icon: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sources: Vec<Citation>,
    },
    ResearchStep {
        agent: String,
        round: usize,
        query: String,
        result_count: usize,
        failed: bool,
    },
    DebateComplete {
        #[serde(default)]
        total_turns: usize,
        #[serde(default)]
        failed_turns: usize,
        #[serde(default)]
        steps_taken: usize,
    },
    Error {
        content: String,
        /// Set when the error belongs to a single turn
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<usize>,
    },
}

impl DebateEvent {
    fn status(code: StatusCode, round: &RoundDef) -> Self {
        DebateEvent::StatusUpdate {
            code,
            round_number: Some(round.number()),
            round_title: Some(round.title.clone()),
            round_type: Some(round.kind),
            agent: None,
            reason: None,
        }
    }

    pub fn round_starting(round: &RoundDef) -> Self {
        Self::status(StatusCode::RoundStarting, round)
    }

    pub fn agent_turn_starting(round: &RoundDef, agent: AgentDisplay) -> Self {
        let mut event = Self::status(StatusCode::AgentTurnStarting, round);
        if let DebateEvent::StatusUpdate { agent: slot, .. } = &mut event {
            *slot = Some(agent);
        }
        event
    }

    pub fn synthesis(round: &RoundDef) -> Self {
        let mut event = Self::status(StatusCode::Synthesis, round);
        if let DebateEvent::StatusUpdate { agent, .. } = &mut event {
            *agent = Some(AgentDisplay::moderator());
        }
        event
    }

    pub fn end(reason: EndReason) -> Self {
        DebateEvent::StatusUpdate {
            code: StatusCode::End,
            round_number: None,
            round_title: None,
            round_type: None,
            agent: None,
            reason: Some(reason),
        }
    }

    /// Content event for a turn: `agent_response` when it completed,
    /// a turn-scoped `error` when it failed.
    pub fn from_turn(turn: &Turn) -> Self {
        if turn.is_failed() {
            return DebateEvent::Error {
                content: turn.content.clone(),
                agent: Some(turn.speaker_name.clone()),
                round: Some(turn.round_number()),
            };
        }
        let agent_id = match &turn.speaker {
            Speaker::Agent(id) => id.to_string(),
            Speaker::Moderator => MODERATOR_ROLE.to_string(),
        };
        DebateEvent::AgentResponse {
            agent: turn.speaker_name.clone(),
            agent_id,
            role: turn.role.clone(),
            content: turn.content.clone(),
            round: turn.round_number(),
            color: turn.color.clone(),
            icon: turn.icon.clone(),
            sources: turn.citations.clone(),
        }
    }

    /// Debate-level error; terminal
    pub fn fatal(content: impl Into<String>) -> Self {
        DebateEvent::Error {
            content: content.into(),
            agent: None,
            round: None,
        }
    }

    /// Wire name of the event's `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            DebateEvent::StatusUpdate { .. } => "status_update",
            DebateEvent::AgentResponse { .. } => "agent_response",
            DebateEvent::ResearchStep { .. } => "research_step",
            DebateEvent::DebateComplete { .. } => "debate_complete",
            DebateEvent::Error { .. } => "error",
        }
    }

    /// Whether no event may follow this one
    pub fn is_terminal(&self) -> bool {
        match self {
            DebateEvent::DebateComplete { .. } => true,
            DebateEvent::Error { agent, round, .. } => agent.is_none() && round.is_none(),
            _ => false,
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            DebateEvent::StatusUpdate { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::spec::ContextStrategy;
    use serde_json::json;

    fn opening() -> RoundDef {
        RoundDef::new(
            0,
            "Opening",
            RoundKind::Parallel,
            ContextStrategy::TopicOnly,
            "",
        )
    }

    #[test]
    fn test_round_starting_wire_shape() {
        let value = serde_json::to_value(DebateEvent::round_starting(&opening())).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "status_update",
                "code": "ROUND_STARTING",
                "round_number": 1,
                "round_title": "Opening",
                "round_type": "parallel"
            })
        );
    }

    #[test]
    fn test_agent_turn_starting_carries_identity() {
        let agent = Agent::new("econ", "Economist", "")
            .with_color("#2563eb")
            .with_icon("💰");
        let event = DebateEvent::agent_turn_starting(&opening(), AgentDisplay::from(&agent));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["code"], "AGENT_TURN_STARTING");
        assert_eq!(value["agent"]["name"], "Economist");
        assert_eq!(value["agent"]["icon"], "💰");
        assert_eq!(event.status_code(), Some(StatusCode::AgentTurnStarting));
    }

    #[test]
    fn test_agent_response_from_turn() {
        let agent = Agent::new("eth", "Ethicist", "").with_role("ethicist");
        let turn = Turn::from_agent(1, &agent, "We must weigh harms.");
        let value = serde_json::to_value(DebateEvent::from_turn(&turn)).unwrap();
        assert_eq!(value["type"], "agent_response");
        assert_eq!(value["agent"], "Ethicist");
        assert_eq!(value["role"], "ethicist");
        assert_eq!(value["round"], 2);
        assert!(value.get("sources").is_none());
    }

    #[test]
    fn test_failed_turn_becomes_turn_error() {
        let agent = Agent::new("eth", "Ethicist", "");
        let turn = Turn::from_agent(0, &agent, "").into_failed("provider timed out");
        let event = DebateEvent::from_turn(&turn);
        assert_eq!(event.kind(), "error");
        assert!(!event.is_terminal());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["content"], "provider timed out");
        assert_eq!(value["agent"], "Ethicist");
    }

    #[test]
    fn test_terminal_events() {
        assert!(DebateEvent::fatal("budget").is_terminal());
        assert!(
            DebateEvent::DebateComplete {
                total_turns: 5,
                failed_turns: 0,
                steps_taken: 5
            }
            .is_terminal()
        );
        assert!(!DebateEvent::end(EndReason::Completed).is_terminal());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let raw = r#"{"type":"debate_complete","extra":"ignored"}"#;
        let event: DebateEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            DebateEvent::DebateComplete {
                total_turns: 0,
                failed_turns: 0,
                steps_taken: 0
            }
        );
    }

    #[test]
    fn test_synthesis_names_moderator() {
        let round = RoundDef::new(
            2,
            "Synthesis",
            RoundKind::Moderator,
            ContextStrategy::FullTranscript,
            "",
        );
        let value = serde_json::to_value(DebateEvent::synthesis(&round)).unwrap();
        assert_eq!(value["code"], "SYNTHESIS");
        assert_eq!(value["agent"]["name"], "Moderator");
        assert_eq!(value["round_type"], "moderator");
    }
}
