//! Persona template: turns a structured persona into an agent system prompt

use crate::agent::{Agent, DEFAULT_ROLE};
use serde::{Deserialize, Serialize};

/// Every debater must open with its position.
pub const STANCE_REQUIREMENT: &str = "Your first sentence must state your position. You must then immediately present your single most compelling argument to support that position.";

/// Debaters may invent concrete figures only when they flag them as assumptions.
pub const GROUNDED_SPECULATION: &str = "Grounded Speculation: To make your arguments concrete, you are permitted to introduce plausible, specific data points, scenarios, or outcomes. You must preface these with a phrase like \"Assuming...\", \"If we project that...\", \"Let's assume for a moment that...\", \"If this policy were implemented, we might see...\", \"The potential consequences could include...\", \"This could lead to scenarios where...\", \"Assuming current technology trends...\", \"Based on typical implementation patterns...\", or similar qualifying language.";

/// Debaters argue from their perspective instead of announcing it.
pub const PERSONA_CONSTRAINT: &str = "Constraint: Do not refer to your own role or persona (e.g., do not say \"As an economist...\" or \"From an economic perspective...\"). Argue from your perspective, don't describe it.";

const OPENING_STRATEGY: &str = "Opening Statement Strategy: Lead with your strongest, most compelling argument. Do not spend time laying out questions or providing a roadmap - make your case immediately and forcefully.";

/// Directives shared by every persona
pub fn common_directives() -> String {
    format!("{STANCE_REQUIREMENT}\n\n{GROUNDED_SPECULATION}\n\n{PERSONA_CONSTRAINT}")
}

/// Structured description of a debate persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaTemplate {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// e.g. "economist, specializing in macroeconomic theory"
    pub specialization: String,
    /// Completes "Your primary goal in any debate is to ..."
    pub primary_goal: String,
    #[serde(default)]
    pub key_principles: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub communication_style: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl PersonaTemplate {
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }

    /// Render the full system prompt
    pub fn system_prompt(&self) -> String {
        let mut sections = vec![
            format!(
                "You are a highly-trained {}. You view all issues through the lens of {}.",
                self.specialization,
                self.role()
            ),
            format!(
                "Your primary goal in any debate is to {}.",
                self.primary_goal.trim_end_matches('.')
            ),
            common_directives(),
        ];

        if !self.key_principles.is_empty() {
            let principles = self
                .key_principles
                .iter()
                .map(|p| format!("- {p}"))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("Key Principles:\n{principles}"));
        }
        if let Some(scope) = &self.scope {
            sections.push(format!("Scope: {scope}"));
        }
        if let Some(style) = &self.communication_style {
            sections.push(format!("Communication Style: {style}"));
        }
        sections.push(OPENING_STRATEGY.to_string());

        sections.join("\n\n")
    }

    /// Build the agent this persona describes
    pub fn to_agent(&self, id: impl Into<String>) -> Agent {
        let mut agent = Agent::new(id, &self.name, self.system_prompt()).with_role(self.role());
        if let Some(color) = &self.color {
            agent = agent.with_color(color);
        }
        if let Some(icon) = &self.icon {
            agent = agent.with_icon(icon);
        }
        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economist() -> PersonaTemplate {
        PersonaTemplate {
            name: "The Economist".into(),
            role: Some("economist".into()),
            specialization: "economist, specializing in behavioral economics".into(),
            primary_goal: "identify the most economically efficient path forward".into(),
            key_principles: vec!["Incentives Matter Most".into(), "Opportunity cost".into()],
            scope: Some("Fiscal policy and markets.".into()),
            communication_style: None,
            color: Some("#2563eb".into()),
            icon: Some("💰".into()),
        }
    }

    #[test]
    fn test_system_prompt_sections_in_order() {
        let prompt = economist().system_prompt();
        let identity = prompt.find("You are a highly-trained economist").unwrap();
        let goal = prompt.find("Your primary goal in any debate is to identify").unwrap();
        let stance = prompt.find("Your first sentence must state your position").unwrap();
        let principles = prompt.find("Key Principles:\n- Incentives Matter Most\n- Opportunity cost").unwrap();
        let scope = prompt.find("Scope: Fiscal policy and markets.").unwrap();
        assert!(identity < goal && goal < stance && stance < principles && principles < scope);
        assert!(!prompt.contains("Communication Style"));
        assert!(prompt.ends_with("make your case immediately and forcefully."));
    }

    #[test]
    fn test_to_agent() {
        let agent = economist().to_agent("economist");
        assert_eq!(agent.id.as_str(), "economist");
        assert_eq!(agent.name, "The Economist");
        assert_eq!(agent.role, "economist");
        assert_eq!(agent.color, "#2563eb");
        assert_eq!(agent.icon, "💰");
        assert!(agent.system_prompt.contains(PERSONA_CONSTRAINT));
    }

    #[test]
    fn test_missing_role_uses_default() {
        let mut persona = economist();
        persona.role = None;
        assert_eq!(persona.to_agent("x").role, DEFAULT_ROLE);
        assert!(persona.system_prompt().contains("through the lens of debater"));
    }
}
