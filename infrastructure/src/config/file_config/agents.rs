//! Custom panel from TOML (`[[agents]]` array)
//!
//! ```toml
//! [[agents]]
//! id = "historian"
//! name = "The Historian"
//! role = "historian"
//! color = "#b45309"
//! icon = "📜"
//!
//! [agents.persona]
//! specialization = "historian of economic policy"
//! primary_goal = "ground the debate in what has actually happened before"
//! key_principles = ["Precedent beats prediction"]
//! ```
//!
//! An agent either gives its `system_prompt` verbatim or a `persona` table
//! that is rendered through [`PersonaTemplate`].

use crate::config::ConfigError;
use parliament_domain::{Agent, PersonaTemplate};
use serde::{Deserialize, Serialize};

/// One custom agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub persona: Option<FilePersonaConfig>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Structured persona for a custom agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePersonaConfig {
    pub specialization: String,
    pub primary_goal: String,
    #[serde(default)]
    pub key_principles: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub communication_style: Option<String>,
}

impl FileAgentConfig {
    pub fn is_complete(&self) -> bool {
        self.system_prompt.is_some() || self.persona.is_some()
    }

    /// Build the domain agent. An explicit system prompt wins over a persona.
    pub fn to_agent(&self) -> Result<Agent, ConfigError> {
        let agent = match (&self.system_prompt, &self.persona) {
            (Some(prompt), _) => {
                let agent = Agent::new(&self.id, &self.name, prompt);
                match &self.role {
                    Some(role) => agent.with_role(role),
                    None => agent,
                }
            }
            (None, Some(persona)) => PersonaTemplate {
                name: self.name.clone(),
                role: self.role.clone(),
                specialization: persona.specialization.clone(),
                primary_goal: persona.primary_goal.clone(),
                key_principles: persona.key_principles.clone(),
                scope: persona.scope.clone(),
                communication_style: persona.communication_style.clone(),
                color: None,
                icon: None,
            }
            .to_agent(&self.id),
            (None, None) => {
                return Err(ConfigError::IncompleteAgent {
                    id: self.id.clone(),
                });
            }
        };

        let agent = match &self.color {
            Some(color) => agent.with_color(color),
            None => agent,
        };
        Ok(match &self.icon {
            Some(icon) => agent.with_icon(icon),
            None => agent,
        })
    }
}
