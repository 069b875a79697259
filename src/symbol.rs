//! Symbol types - the flat, indexed form of a declaration
//!
//! Every declaration in the semantic model is reduced to:
//! - a qualified name
//! - a `SymbolKind` tag
//! - a `Visibility` tag
//! - an optional extension receiver type

use crate::name::QualifiedName;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classification of an indexed declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Class or object declaration
    Class,
    Interface,
    /// Top-level or member function
    Function,
    /// Property, local or top-level variable
    Variable,
    /// Package or module
    Module,
    Enum,
    EnumMember,
    Constructor,
    Field,
    Unknown,
}

impl SymbolKind {
    /// Get the string representation of the symbol kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Module => "module",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enum_member",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Field => "field",
            SymbolKind::Unknown => "unknown",
        }
    }

    /// Get all symbol kinds
    pub fn all() -> &'static [SymbolKind] {
        &[
            SymbolKind::Class,
            SymbolKind::Interface,
            SymbolKind::Function,
            SymbolKind::Variable,
            SymbolKind::Module,
            SymbolKind::Enum,
            SymbolKind::EnumMember,
            SymbolKind::Constructor,
            SymbolKind::Field,
            SymbolKind::Unknown,
        ]
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "class" | "object" | "struct" => Ok(SymbolKind::Class),
            "interface" | "trait" => Ok(SymbolKind::Interface),
            "function" | "fun" | "method" | "fn" => Ok(SymbolKind::Function),
            "variable" | "val" | "var" => Ok(SymbolKind::Variable),
            "module" | "package" | "namespace" => Ok(SymbolKind::Module),
            "enum" => Ok(SymbolKind::Enum),
            "enum_member" | "enum_entry" => Ok(SymbolKind::EnumMember),
            "constructor" | "init" => Ok(SymbolKind::Constructor),
            "field" | "property" => Ok(SymbolKind::Field),
            "unknown" => Ok(SymbolKind::Unknown),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared visibility of an indexed declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    PrivateToThis,
    Private,
    Internal,
    Protected,
    Public,
    Unknown,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::PrivateToThis => "private_to_this",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
            Visibility::Unknown => "unknown",
        }
    }

    pub fn all() -> &'static [Visibility] {
        &[
            Visibility::PrivateToThis,
            Visibility::Private,
            Visibility::Internal,
            Visibility::Protected,
            Visibility::Public,
            Visibility::Unknown,
        ]
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "private_to_this" => Ok(Visibility::PrivateToThis),
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            "protected" => Ok(Visibility::Protected),
            "public" => Ok(Visibility::Public),
            "unknown" => Ok(Visibility::Unknown),
            _ => Err(Error::UnknownVisibility(s.to_string())),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One indexed declaration.
///
/// The qualified name is the identity; two symbols are equal when their
/// names are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Fully qualified name of the declaration
    pub name: QualifiedName,
    pub kind: SymbolKind,
    pub visibility: Visibility,
    /// Receiver type for extension members, `None` otherwise
    pub receiver_type: Option<QualifiedName>,
}

impl Symbol {
    pub fn new(name: QualifiedName, kind: SymbolKind, visibility: Visibility) -> Self {
        Self {
            name,
            kind,
            visibility,
            receiver_type: None,
        }
    }

    /// Mark this symbol as an extension on `receiver`
    pub fn with_receiver(mut self, receiver: QualifiedName) -> Self {
        self.receiver_type = Some(receiver);
        self
    }

    /// Short name used for prefix matching
    pub fn short_name(&self) -> &str {
        self.name.short_name()
    }

    pub fn is_extension(&self) -> bool {
        self.receiver_type.is_some()
    }

    /// Get a short description for display
    pub fn short_description(&self) -> String {
        match &self.receiver_type {
            Some(receiver) => format!("{} {} {}.{}", self.visibility, self.kind, receiver, self.short_name()),
            None => format!("{} {} {}", self.visibility, self.kind, self.name),
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_kind_roundtrip() {
        for kind in SymbolKind::all() {
            let parsed: SymbolKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
        for visibility in Visibility::all() {
            let parsed: Visibility = visibility.as_str().parse().unwrap();
            assert_eq!(*visibility, parsed);
        }
    }

    #[test]
    fn test_symbol_kind_aliases() {
        assert_eq!(SymbolKind::from_str("object").unwrap(), SymbolKind::Class);
        assert_eq!(SymbolKind::from_str("fun").unwrap(), SymbolKind::Function);
        assert_eq!(SymbolKind::from_str("property").unwrap(), SymbolKind::Field);
        assert_eq!(SymbolKind::from_str("package").unwrap(), SymbolKind::Module);
        assert!(SymbolKind::from_str("macro").is_err());
        assert!(Visibility::from_str("exported").is_err());
    }

    #[test]
    fn test_extension_description() {
        let symbol = Symbol::new(
            QualifiedName::new("pkg.Foo.bar").unwrap(),
            SymbolKind::Function,
            Visibility::Public,
        )
        .with_receiver(QualifiedName::new("pkg.Baz").unwrap());

        assert!(symbol.is_extension());
        assert_eq!(symbol.short_name(), "bar");
        assert_eq!(symbol.short_description(), "public function pkg.Baz.bar");
    }
}
