//! Ignore-rule patterns and order-preserving deduplication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Marker that starts an inline comment inside a pattern.
pub const COMMENT_MARKER: char = '#';

/// A single glob-style ignore rule, kept verbatim.
///
/// The verbatim text (including any inline comment) is what gets written back
/// out. Identity for deduplication and matching uses [`Pattern::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Box<str>);

impl Pattern {
    /// Wrap raw pattern text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().into_boxed_str())
    }

    /// Verbatim text, including any inline comment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comparison key: text before the first `#`, trimmed.
    #[must_use]
    pub fn key(&self) -> &str {
        pattern_key(&self.0)
    }

    /// True when nothing is left after stripping the comment.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.key().is_empty()
    }

    /// True for explicit directory-only rules such as `venv/`.
    #[must_use]
    pub fn is_directory_only(&self) -> bool {
        let key = self.key();
        key.len() > 1 && key.ends_with('/')
    }

    /// Two patterns are the same rule when their keys are equal.
    #[must_use]
    pub fn same_rule(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Strip an inline comment and surrounding whitespace.
#[must_use]
pub fn pattern_key(raw: &str) -> &str {
    raw.split(COMMENT_MARKER).next().unwrap_or_default().trim()
}

/// Remove duplicate and blank patterns in a single pass.
///
/// The first occurrence of each key wins and keeps its verbatim text;
/// relative order of the survivors is unchanged.
pub fn dedupe_patterns<I>(patterns: I) -> Vec<Pattern>
where
    I: IntoIterator<Item = Pattern>,
{
    let iter = patterns.into_iter();
    let mut seen: HashSet<Box<str>> = HashSet::with_capacity(iter.size_hint().0);
    let mut out = Vec::with_capacity(iter.size_hint().0);
    for pattern in iter {
        let key = pattern.key();
        if key.is_empty() || seen.contains(key) {
            continue;
        }
        seen.insert(key.to_owned().into_boxed_str());
        out.push(pattern);
    }
    out
}
