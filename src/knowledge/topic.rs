//! Topic paths and the patterns used to select them.
//!
//! A plain pattern such as `/team` selects that topic and every descendant
//! (`/team/onboarding`), but not siblings that merely share characters
//! (`/teamwork`). A pattern ending in [`WILDCARD`] is a raw string prefix:
//! `/team*` selects `/team`, `/team/onboarding` and `/teamwork`.

use std::fmt;

/// Trailing marker that switches a pattern to raw-prefix matching.
pub const WILDCARD: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicPattern {
    /// Normalized topic path; matches itself and all descendants.
    Subtree(String),
    /// Raw string prefix, taken as given.
    Prefix(String),
}

impl TopicPattern {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_suffix(WILDCARD) {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Subtree(normalize_topic(raw)),
        }
    }

    /// The `(exact, prefix)` pair a topic is compared against: a topic matches
    /// when it equals `exact` or starts with `prefix`. Stores that filter in
    /// SQL bind these two values instead of building a `LIKE` pattern.
    pub fn bounds(&self) -> (String, String) {
        match self {
            Self::Subtree(path) => {
                let prefix = if path.ends_with('/') {
                    path.clone()
                } else {
                    format!("{path}/")
                };
                (path.clone(), prefix)
            }
            Self::Prefix(prefix) => (prefix.clone(), prefix.clone()),
        }
    }

    pub fn matches(&self, topic: &str) -> bool {
        let (exact, prefix) = self.bounds();
        topic == exact || topic.starts_with(&prefix)
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtree(path) => f.write_str(path),
            Self::Prefix(prefix) => write!(f, "{prefix}{WILDCARD}"),
        }
    }
}

/// Trim whitespace and trailing slashes. The root `/` is kept as is.
pub fn normalize_topic(topic: &str) -> String {
    let trimmed = topic.trim();
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() && trimmed.starts_with('/') {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}
