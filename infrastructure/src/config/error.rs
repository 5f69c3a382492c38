//! Configuration errors

use parliament_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning configuration into a runnable debate.
///
/// All of them are fatal and reported before the debate starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Agent '{id}' needs either a system_prompt or a [agents.persona] table")]
    IncompleteAgent { id: String },

    #[error("Invalid panel: {0}")]
    Panel(#[from] DomainError),

    #[error("Built-in persona file is malformed: {0}")]
    Personas(#[source] toml::de::Error),

    #[error(
        "Step limit {limit} is too low: the largest round needs {required} step(s) with {panel_size} agent(s)"
    )]
    StepLimitTooLow {
        limit: usize,
        required: usize,
        panel_size: usize,
    },

    #[error("Environment variable {var} is not set (needed for {purpose})")]
    MissingEnv { var: String, purpose: &'static str },

    #[error("Could not create event log {}: {source}", path.display())]
    EventLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
