//! Search hits and inline citations
//!
//! Every hit shown to an agent gets a numeric marker (`[1]`, `[2]`, ...)
//! that is stable for the whole turn. The finalized answer is scanned for
//! markers and only the sources it actually cites are attached.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{1,3})\]").expect("citation marker regex is valid"));

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A source cited by a finalized turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub marker: usize,
    pub title: String,
    pub url: String,
}

/// Per-turn registry of the hits an agent has observed
#[derive(Debug, Clone, Default)]
pub struct CitationLedger {
    sources: Vec<SearchHit>,
}

impl CitationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hits and return the marker assigned to each, in order.
    ///
    /// A URL seen earlier in the turn keeps its first marker.
    pub fn register(&mut self, hits: &[SearchHit]) -> Vec<usize> {
        hits.iter()
            .map(|hit| match self.sources.iter().position(|s| s.url == hit.url) {
                Some(existing) => existing + 1,
                None => {
                    self.sources.push(hit.clone());
                    self.sources.len()
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Sources referenced by markers in `text`, ordered by marker
    pub fn cited_in(&self, text: &str) -> Vec<Citation> {
        let markers: BTreeSet<usize> = MARKER
            .captures_iter(text)
            .filter_map(|c| c[1].parse().ok())
            .filter(|&n| n >= 1 && n <= self.sources.len())
            .collect();

        markers
            .into_iter()
            .map(|marker| {
                let hit = &self.sources[marker - 1];
                Citation {
                    marker,
                    title: hit.title.clone(),
                    url: hit.url.clone(),
                }
            })
            .collect()
    }

    /// Append a `Sources:` list for the markers used in `text`.
    ///
    /// Returns the text unchanged when nothing is cited.
    pub fn attach_sources(&self, text: &str) -> (String, Vec<Citation>) {
        let cited = self.cited_in(text);
        if cited.is_empty() {
            return (text.to_string(), cited);
        }
        let mut out = text.trim_end().to_string();
        out.push_str("\n\nSources:");
        for c in &cited {
            out.push_str(&format!("\n[{}] {} - {}", c.marker, c.title, c.url));
        }
        (out, cited)
    }
}
