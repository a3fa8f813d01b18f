//! Highlight marker injection.
//!
//! Terms are applied one after another, each over the text produced by the
//! previous one. A later term can therefore match inside markup inserted by
//! an earlier term (searching `hello mark` marks the `mark` inside the first
//! `<mark>` tag). Within one term every occurrence is wrapped exactly once.

use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Opening and closing markup placed around each match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl HighlightMarker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    fn wrap(&self, matched: &str) -> String {
        format!("{}{matched}{}", self.open, self.close)
    }
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

/// Precompiled case-insensitive patterns for a list of terms.
#[derive(Debug, Clone)]
pub struct Highlighter {
    patterns: Vec<Regex>,
    marker: HighlightMarker,
}

impl Highlighter {
    /// Compiles one literal, case-insensitive pattern per non-empty term.
    pub fn new(terms: &[&str], marker: HighlightMarker) -> Result<Self, regex::Error> {
        let patterns = terms
            .iter()
            .filter(|term| !term.is_empty())
            .map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns, marker })
    }

    /// Wraps every occurrence of each term, keeping the text's own casing.
    pub fn apply(&self, text: &str) -> String {
        self.patterns
            .iter()
            .fold(text.to_string(), |current, pattern| {
                pattern
                    .replace_all(&current, |caps: &Captures<'_>| self.marker.wrap(&caps[0]))
                    .into_owned()
            })
    }
}
