//! Construction of search patterns from user input.
//!
//! The matcher takes compiled [`Regex`] values. This module builds them from
//! the three inputs a viewer has: a free-text query, a list of literal words
//! (entity values), and saved exclusion lists mixing literal strings and
//! regular expressions.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for building a pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Case insensitive search
    pub case_insensitive: bool,
    /// Treat pattern as literal text (not regex)
    pub literal: bool,
}

impl SearchOptions {
    /// Create new default search options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable case-insensitive search.
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Default::default()
        }
    }

    /// Set case sensitivity.
    pub fn with_case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    /// Treat pattern as literal text (escape regex special characters).
    pub fn with_literal(mut self, value: bool) -> Self {
        self.literal = value;
        self
    }
}

/// Escape regex metacharacters so `term` matches itself literally.
///
/// # Examples
///
/// ```
/// use blockview::search::escape_literal;
///
/// assert_eq!(escape_literal("$5.00 (net)"), r"\$5\.00 \(net\)");
/// ```
pub fn escape_literal(term: &str) -> String {
    regex::escape(term)
}

/// Build a pattern from `pattern` and `options`.
pub fn build_pattern(pattern: &str, options: &SearchOptions) -> Result<Regex> {
    let pattern_str = if options.literal {
        escape_literal(pattern)
    } else {
        pattern.to_string()
    };

    RegexBuilder::new(&pattern_str)
        .case_insensitive(options.case_insensitive)
        .build()
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Patterns for a free-text search box: one case-insensitive literal pattern,
/// or none for a blank query.
pub fn query_patterns(query: &str) -> Result<Vec<Regex>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let options = SearchOptions::case_insensitive().with_literal(true);
    Ok(vec![build_pattern(query, &options)?])
}

/// Case-sensitive literal patterns, one per word.
pub fn literal_patterns<S: AsRef<str>>(words: &[S]) -> Result<Vec<Regex>> {
    let options = SearchOptions::new().with_literal(true);
    words
        .iter()
        .map(|w| build_pattern(w.as_ref(), &options))
        .collect()
}

/// How an exclusion list item is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionKind {
    /// Literal text
    String,
    /// Regular expression; any unknown kind is treated as one
    #[serde(other)]
    Regex,
}

/// One entry of a saved exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionItem {
    /// Interpretation of `value`
    #[serde(rename = "type")]
    pub kind: ExclusionKind,
    /// Text or expression
    pub value: String,
}

impl ExclusionItem {
    /// A literal text item.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            kind: ExclusionKind::String,
            value: value.into(),
        }
    }

    /// A regular expression item.
    pub fn regex(value: impl Into<String>) -> Self {
        Self {
            kind: ExclusionKind::Regex,
            value: value.into(),
        }
    }

    /// Compile the item into a case-insensitive pattern.
    pub fn to_pattern(&self) -> Result<Regex> {
        let options = SearchOptions::case_insensitive().with_literal(self.kind == ExclusionKind::String);
        build_pattern(&self.value, &options)
    }
}

/// A named, saved exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionList {
    /// Display name
    pub name: String,
    /// Items to redact
    #[serde(default)]
    pub items: Vec<ExclusionItem>,
}

impl ExclusionList {
    /// Compile every item.
    pub fn patterns(&self) -> Result<Vec<Regex>> {
        exclusion_patterns(&self.items)
    }
}

/// Compile exclusion list items, failing on the first invalid expression.
pub fn exclusion_patterns(items: &[ExclusionItem]) -> Result<Vec<Regex>> {
    items.iter().map(ExclusionItem::to_pattern).collect()
}
