//! Configuration file loading for parliament
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PARLIAMENT_*` environment variables (`PARLIAMENT_DEBATE__STEP_LIMIT=30`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./parliament.toml` or `./.parliament.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/parliament/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileAgentConfig, FileConfig, FileDebateConfig, FileOutputConfig, FilePersonaConfig,
    FileProviderConfig, FileResearchConfig, ResearchProvider,
};
pub use loader::ConfigLoader;
