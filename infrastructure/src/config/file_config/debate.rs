//! Debate configuration from TOML (`[debate]` section)

use parliament_application::FailurePolicyKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Step limit; unset means "recommended for the spec and panel"
    pub step_limit: Option<usize>,
    /// What a round with failed turns does to the debate
    pub failure_policy: FailurePolicyKind,
    /// Timeout for one LLM completion, `0` disables it
    pub turn_timeout_secs: u64,
    /// DebateSpec TOML file; unset uses the built-in four-round debate
    pub spec: Option<PathBuf>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            step_limit: None,
            failure_policy: FailurePolicyKind::default(),
            turn_timeout_secs: 120,
            spec: None,
        }
    }
}

impl FileDebateConfig {
    pub fn turn_timeout(&self) -> Option<Duration> {
        (self.turn_timeout_secs > 0).then(|| Duration::from_secs(self.turn_timeout_secs))
    }
}
