//! Qualified names - dotted identity for declarations and types
//!
//! Format: `<segment>.<segment>...<segment>`
//!
//! Examples:
//! - `kotlin.collections.List`
//! - `com.example.Foo.bar`
//!
//! The empty string is the root namespace.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dotted identifier path uniquely naming a declaration or a type.
///
/// This name serves as the primary key for:
/// - Qualified name rows
/// - Symbol rows
/// - Extension receiver references
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    full: String,
}

impl QualifiedName {
    /// Parse and validate a dotted path.
    ///
    /// Empty segments (`a..b`, `.a`, `a.`) are rejected. The empty string
    /// yields the root name.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let full = path.into();
        if !full.is_empty() && full.split('.').any(str::is_empty) {
            return Err(Error::InvalidName(full));
        }
        Ok(Self { full })
    }

    /// The root namespace
    pub fn root() -> Self {
        Self { full: String::new() }
    }

    pub fn is_root(&self) -> bool {
        self.full.is_empty()
    }

    /// The full dotted path
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Final path segment, used for prefix search
    pub fn short_name(&self) -> &str {
        match self.full.rsplit_once('.') {
            Some((_, short)) => short,
            None => &self.full,
        }
    }

    /// Everything before the final segment, or `None` for the root
    pub fn parent(&self) -> Option<QualifiedName> {
        if self.is_root() {
            return None;
        }
        let parent = match self.full.rsplit_once('.') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        Some(Self { full: parent })
    }

    /// Append one segment to this name
    pub fn child(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains('.') {
            return Err(Error::InvalidName(format!("{}.{}", self.full, segment)));
        }
        let full = if self.is_root() {
            segment.to_string()
        } else {
            format!("{}.{}", self.full, segment)
        };
        Ok(Self { full })
    }

    /// Number of segments (0 for the root)
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.full.split('.').count()
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for QualifiedName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_last_segment() {
        let name = QualifiedName::new("pkg.Foo.bar").unwrap();
        assert_eq!(name.short_name(), "bar");
        assert!(name.as_str().ends_with(name.short_name()));

        let top = QualifiedName::new("Foo").unwrap();
        assert_eq!(top.short_name(), "Foo");
    }

    #[test]
    fn test_root() {
        let root = QualifiedName::new("").unwrap();
        assert!(root.is_root());
        assert_eq!(root.short_name(), "");
        assert_eq!(root.depth(), 0);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_invalid_names() {
        assert!(QualifiedName::new("a..b").is_err());
        assert!(QualifiedName::new(".a").is_err());
        assert!(QualifiedName::new("a.").is_err());
        assert!(QualifiedName::root().child("").is_err());
        assert!(QualifiedName::root().child("a.b").is_err());
    }

    #[test]
    fn test_child_and_parent() {
        let pkg = QualifiedName::root().child("com").unwrap().child("example").unwrap();
        assert_eq!(pkg.as_str(), "com.example");
        assert_eq!(pkg.depth(), 2);
        assert_eq!(pkg.parent().unwrap().as_str(), "com");
        assert!(pkg.parent().unwrap().parent().unwrap().is_root());
    }

    #[test]
    fn test_serde_as_string() {
        let name: QualifiedName = serde_json::from_str("\"pkg.Baz\"").unwrap();
        assert_eq!(name.short_name(), "Baz");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"pkg.Baz\"");
        assert!(serde_json::from_str::<QualifiedName>("\"pkg..Baz\"").is_err());
    }
}
