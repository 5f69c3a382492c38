//! Panel construction: the built-in personas or the `[[agents]]` config

use crate::config::{ConfigError, FileAgentConfig};
use parliament_domain::{Agent, Panel, PersonaTemplate};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_PERSONAS: &str = include_str!("../../defaults/personas.toml");

#[derive(Debug, Deserialize)]
struct PersonaDocument {
    agents: Vec<PersonaEntry>,
}

#[derive(Debug, Deserialize)]
struct PersonaEntry {
    id: String,
    #[serde(flatten)]
    persona: PersonaTemplate,
}

/// The built-in panel: Economist, Ethicist, Technologist, Sociologist
pub fn default_panel() -> Result<Panel, ConfigError> {
    let document: PersonaDocument =
        toml::from_str(DEFAULT_PERSONAS).map_err(ConfigError::Personas)?;
    let agents = document
        .agents
        .into_iter()
        .map(|entry| entry.persona.to_agent(entry.id));
    Ok(Panel::from_agents(agents)?)
}

/// Panel from config, falling back to the built-in panel when none is declared
pub fn build_panel(agents: &[FileAgentConfig]) -> Result<Panel, ConfigError> {
    if agents.is_empty() {
        return default_panel();
    }

    let agents = agents
        .iter()
        .map(FileAgentConfig::to_agent)
        .collect::<Result<Vec<Agent>, _>>()?;
    debug!("Using {} configured agent(s)", agents.len());
    Ok(Panel::from_agents(agents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parliament_domain::DomainError;

    #[test]
    fn test_default_panel() {
        let panel = default_panel().unwrap();
        let names: Vec<&str> = panel.agents().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "The Economist",
                "The Ethicist",
                "The Technologist",
                "The Sociologist"
            ]
        );

        let economist = &panel.agents()[0];
        assert_eq!(economist.role, "economist");
        assert_eq!(economist.color, "#2563eb");
        assert_eq!(economist.icon, "💰");
        assert!(economist.system_prompt.contains("Incentives Matter Most"));
        assert!(
            economist
                .system_prompt
                .contains("Do not refer to your own role or persona")
        );
    }

    #[test]
    fn test_empty_config_uses_default_panel() {
        assert_eq!(build_panel(&[]).unwrap().len(), 4);
    }

    fn custom(id: &str) -> FileAgentConfig {
        FileAgentConfig {
            id: id.into(),
            name: id.to_uppercase(),
            role: None,
            system_prompt: Some(format!("You are {id}.")),
            persona: None,
            color: None,
            icon: None,
        }
    }

    #[test]
    fn test_configured_panel_keeps_order() {
        let panel = build_panel(&[custom("b"), custom("a")]).unwrap();
        let ids: Vec<&str> = panel.agents().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        assert!(matches!(
            build_panel(&[custom("a"), custom("a")]),
            Err(ConfigError::Panel(DomainError::DuplicateAgent(_)))
        ));
    }
}
