//! Name and label filtering of series.
//!
//! Patterns are compiled once when the filter is built; a bad regex is a
//! startup error, never a per-series one.

use std::fmt;

use regex::Regex;

use crate::storage::{Labels, MetricSeries};

/// How the label pattern is interpreted, decided by its syntax.
#[derive(Debug, Clone)]
pub enum LabelMatcher {
    /// `key=~regex`: label `key` exists and its value matches `regex`.
    Regex { key: String, pattern: Regex },
    /// `key=value`: label `key` exists and equals `value` exactly.
    Exact { key: String, value: String },
    /// No `=`: any label value matches the whole pattern.
    AnyValue(Regex),
}

impl LabelMatcher {
    /// Parses a label pattern. The split happens at the first `=`.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        match pattern.split_once('=') {
            Some((key, rest)) => match rest.strip_prefix('~') {
                Some(re) => Ok(LabelMatcher::Regex {
                    key: key.to_string(),
                    pattern: Regex::new(re)?,
                }),
                None => Ok(LabelMatcher::Exact {
                    key: key.to_string(),
                    value: rest.to_string(),
                }),
            },
            None => Ok(LabelMatcher::AnyValue(Regex::new(pattern)?)),
        }
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        match self {
            LabelMatcher::Regex { key, pattern } => {
                labels.get(key).is_some_and(|v| pattern.is_match(v))
            }
            LabelMatcher::Exact { key, value } => labels.get(key).is_some_and(|v| v == value),
            LabelMatcher::AnyValue(pattern) => labels.values().any(|v| pattern.is_match(v)),
        }
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelMatcher::Regex { key, pattern } => write!(f, "{}=~{}", key, pattern.as_str()),
            LabelMatcher::Exact { key, value } => write!(f, "{}={}", key, value),
            LabelMatcher::AnyValue(pattern) => f.write_str(pattern.as_str()),
        }
    }
}

/// Compiled name and label filter. The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    name: Option<Regex>,
    label: Option<LabelMatcher>,
}

impl FilterSpec {
    /// Compiles the two patterns. Empty strings disable the respective check.
    pub fn new(name_pattern: &str, label_pattern: &str) -> Result<Self, FilterError> {
        let name = if name_pattern.is_empty() {
            None
        } else {
            Some(Regex::new(name_pattern).map_err(FilterError::Name)?)
        };
        let label = if label_pattern.is_empty() {
            None
        } else {
            Some(LabelMatcher::parse(label_pattern).map_err(FilterError::Label)?)
        };
        Ok(Self { name, label })
    }

    /// Returns true if no check is active.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.label.is_none()
    }

    /// Name regex source, if any.
    pub fn name_pattern(&self) -> Option<&str> {
        self.name.as_ref().map(Regex::as_str)
    }

    /// Short text for the header bar, `None` when nothing is filtered.
    pub fn summary(&self) -> Option<String> {
        match (self.name_pattern(), &self.label) {
            (None, None) => None,
            (Some(name), None) => Some(format!("/{}/", name)),
            (None, Some(label)) => Some(format!("{{{}}}", label)),
            (Some(name), Some(label)) => Some(format!("/{}/ {{{}}}", name, label)),
        }
    }

    pub fn matches_parts(&self, name: &str, labels: &Labels) -> bool {
        let name_ok = self.name.as_ref().is_none_or(|re| re.is_match(name));
        name_ok && self.label.as_ref().is_none_or(|m| m.matches(labels))
    }

    pub fn matches(&self, series: &MetricSeries) -> bool {
        self.matches_parts(series.name(), series.labels())
    }
}

/// Invalid filter pattern.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid metric filter regex: {0}")]
    Name(#[source] regex::Error),
    #[error("invalid label filter regex: {0}")]
    Label(#[source] regex::Error),
}
