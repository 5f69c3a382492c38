//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod debate;
mod output;
mod provider;
mod research;

pub use agents::{FileAgentConfig, FilePersonaConfig};
pub use debate::FileDebateConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use research::{FileResearchConfig, ResearchProvider};

use parliament_application::DebateParams;
use parliament_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Step limit, failure policy, spec file
    pub debate: FileDebateConfig,
    /// Search backend and research loop limits
    pub research: FileResearchConfig,
    /// OpenAI-compatible LLM endpoint
    pub provider: FileProviderConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Custom panel; empty means the built-in panel
    pub agents: Vec<FileAgentConfig>,
}

impl FileConfig {
    /// Orchestrator parameters for a run with the given step limit.
    pub fn debate_params(&self, step_limit: usize) -> DebateParams {
        DebateParams::default()
            .with_step_limit(step_limit)
            .with_turn_timeout(self.debate.turn_timeout())
            .with_tool_timeout(self.research.timeout())
            .with_max_tool_calls(self.research.max_tool_calls)
            .with_max_consecutive_failures(self.research.max_consecutive_failures)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Spec-dependent checks (step limit against round costs) live in
    /// [`parliament_domain::config::validation`] and run once the spec and
    /// panel are known.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.debate.step_limit == Some(0) {
            issues.push(error(
                ConfigIssueCode::InvalidValue,
                "debate.step_limit must be at least 1",
            ));
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::InvalidValue,
                message: format!(
                    "provider.temperature {} is outside 0.0..=2.0; most providers will reject it",
                    self.provider.temperature
                ),
            });
        }
        if self.provider.model.trim().is_empty() {
            issues.push(error(ConfigIssueCode::InvalidValue, "provider.model is empty"));
        }

        if self.research.is_active() {
            if self.research.max_tool_calls == 0 {
                issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidValue,
                    message: "research.max_tool_calls is 0; agents will never search".to_string(),
                });
            }
            if self.research.max_results == 0 {
                issues.push(error(
                    ConfigIssueCode::InvalidValue,
                    "research.max_results must be at least 1",
                ));
            }
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !agent.is_complete() {
                issues.push(error(
                    ConfigIssueCode::IncompleteAgent,
                    format!(
                        "agent '{}' needs either a system_prompt or a persona table",
                        agent.id
                    ),
                ));
            }
            if !seen.insert(agent.id.as_str()) {
                issues.push(error(
                    ConfigIssueCode::InvalidValue,
                    format!("agent id '{}' is declared twice", agent.id),
                ));
            }
        }

        issues
    }
}

fn error(code: ConfigIssueCode, message: impl Into<String>) -> ConfigIssue {
    ConfigIssue {
        severity: Severity::Error,
        code,
        message: message.into(),
    }
}
