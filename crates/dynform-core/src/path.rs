//! # Field Paths
//!
//! A field's fully-qualified path is the dot-joined sequence of `name`
//! values from the schema root down to that field, through any enclosing
//! sections: `email`, `address.city`, `profile.contact.phone`.
//!
//! Paths are split on `.` and nothing else. A field name that itself
//! contains a dot produces a path that cannot be told apart from a nested
//! one; schemas are expected not to do that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dot-separated address of a field inside a nested form record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Split a dotted string into a path. Never fails: an empty string is a
    /// path with one empty segment, matching how the record is addressed.
    pub fn parse(s: &str) -> Self {
        Self(s.split('.').map(str::to_string).collect())
    }

    /// A single-segment path for a top-level field.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// The path of a child field named `name` under this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Extend `parent` (if any) with `name`. Used by recursive walkers that
    /// start at the root with no prefix.
    pub fn join(parent: Option<&FieldPath>, name: &str) -> Self {
        match parent {
            Some(p) => p.child(name),
            None => Self::root(name),
        }
    }

    /// The individual segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True only for a path with no segments, which [`FieldPath::parse`]
    /// never produces.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final segment: the field's own `name`.
    pub fn leaf_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<FieldPath> for String {
    fn from(p: FieldPath) -> Self {
        p.to_string()
    }
}
