//! Agent entities
//!
//! An [`Agent`] is a debate persona: display identity plus the system prompt
//! that shapes every completion requested on its behalf.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role reported for agents that declare no role of their own
pub const DEFAULT_ROLE: &str = "debater";

/// Stable identifier of an agent (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A debate participant (Entity)
///
/// Immutable for the lifetime of a debate. The orchestrator holds agents
/// behind `Arc` so rounds reference them without cloning the prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Short role label shown next to the agent's turns (e.g. "economist")
    pub role: String,
    pub system_prompt: String,
    /// Display color as a `#rrggbb` hex string
    pub color: String,
    pub icon: String,
}

impl Agent {
    /// Create an agent with the default role, a neutral color and no icon
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::new(id),
            name: name.into(),
            role: DEFAULT_ROLE.to_string(),
            system_prompt: system_prompt.into(),
            color: "#6B7280".to_string(),
            icon: String::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        self.role = if role.trim().is_empty() {
            DEFAULT_ROLE.to_string()
        } else {
            role
        };
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Check that the agent can take part in a debate.
    ///
    /// An agent needs a non-blank id and name; the system prompt may be empty
    /// (the round template still applies).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidAgent("agent id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidAgent(format!(
                "agent '{}' has an empty name",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_builder() {
        let agent = Agent::new("economist", "The Economist", "You analyze incentives.")
            .with_role("economist")
            .with_color("#2563eb")
            .with_icon("💰");

        assert_eq!(agent.id.as_str(), "economist");
        assert_eq!(agent.role, "economist");
        assert_eq!(agent.color, "#2563eb");
        assert_eq!(agent.icon, "💰");
    }

    #[test]
    fn test_blank_role_falls_back_to_default() {
        let agent = Agent::new("a", "A", "").with_role("  ");
        assert_eq!(agent.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_validate() {
        assert!(Agent::new("a", "A", "").validate().is_ok());
        assert!(matches!(
            Agent::new("", "A", "").validate(),
            Err(DomainError::InvalidAgent(_))
        ));
        assert!(matches!(
            Agent::new("a", " ", "").validate(),
            Err(DomainError::InvalidAgent(_))
        ));
    }

    #[test]
    fn test_agent_id_serializes_transparently() {
        let json = serde_json::to_string(&AgentId::new("ethicist")).unwrap();
        assert_eq!(json, "\"ethicist\"");
    }
}
