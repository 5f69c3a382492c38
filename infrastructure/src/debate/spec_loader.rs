//! DebateSpec loader
//!
//! A DebateSpec document is TOML with one `[[rounds]]` table per round:
//!
//! ```toml
//! [[rounds]]
//! title = "Opening Statements"
//! kind = "parallel"              # or `type = ...`
//! context_strategy = "topic_only"
//! prompt_template = "Give your opening statement."
//! ```
//!
//! Round indices come from document order. The built-in four-round debate is
//! embedded at compile time.

use parliament_domain::{DebateSpec, RoundDraft, SpecError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_SPEC: &str = include_str!("../../defaults/debate_spec.toml");

/// Failure to produce a [`DebateSpec`]; always raised before a debate starts
#[derive(Error, Debug)]
pub enum SpecLoadError {
    #[error("Could not read debate spec {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed debate spec: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] SpecError),
}

#[derive(Debug, Deserialize)]
struct SpecDocument {
    #[serde(default)]
    rounds: Vec<RoundDraft>,
}

/// Reads DebateSpec documents
pub struct SpecLoader;

impl SpecLoader {
    /// Load the spec at `path`, or the built-in spec when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<DebateSpec, SpecLoadError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_file(path: &Path) -> Result<DebateSpec, SpecLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| SpecLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::parse(&text)?;
        debug!("Loaded {} round(s) from {}", spec.len(), path.display());
        Ok(spec)
    }

    /// The built-in debate: opening statements, rebuttal, surrebuttal, synthesis
    pub fn builtin() -> Result<DebateSpec, SpecLoadError> {
        Self::parse(DEFAULT_SPEC)
    }

    pub fn parse(text: &str) -> Result<DebateSpec, SpecLoadError> {
        let document: SpecDocument = toml::from_str(text)?;
        Ok(DebateSpec::from_drafts(document.rounds)?)
    }
}
