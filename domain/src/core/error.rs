//! Domain error types

use thiserror::Error;

/// Errors raised while validating debate inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Debate topic cannot be empty")]
    EmptyTopic,

    #[error("Panel must contain at least one agent")]
    EmptyPanel,

    #[error("Agent '{0}' appears more than once in the panel")]
    DuplicateAgent(String),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),
}
