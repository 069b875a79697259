//! Declarations and their classification
//!
//! A declaration is a tagged union over the shapes the model produces.
//! The three extractors (`kind`, `visibility`, `receiver_type`) are
//! exhaustive matches, so adding a variant forces a classification.

use crate::name::QualifiedName;
use crate::symbol::{Symbol, SymbolKind, Visibility};
use serde::{Deserialize, Serialize};

/// Flavor of a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    Object,
    AnnotationClass,
}

fn public() -> Visibility {
    Visibility::Public
}

/// One declaration as produced by the semantic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Class {
        name: QualifiedName,
        #[serde(default)]
        class_kind: ClassKind,
        #[serde(default = "public")]
        visibility: Visibility,
    },
    TypeAlias {
        name: QualifiedName,
        #[serde(default = "public")]
        visibility: Visibility,
    },
    Function {
        name: QualifiedName,
        #[serde(default = "public")]
        visibility: Visibility,
        #[serde(default)]
        receiver: Option<QualifiedName>,
    },
    Property {
        name: QualifiedName,
        #[serde(default = "public")]
        visibility: Visibility,
        #[serde(default)]
        receiver: Option<QualifiedName>,
    },
    Constructor {
        name: QualifiedName,
        #[serde(default = "public")]
        visibility: Visibility,
    },
    /// Local or script-level variable; carries no declared visibility
    Variable { name: QualifiedName },
    Package { name: QualifiedName },
    TypeParameter { name: QualifiedName },
}

impl Declaration {
    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            Declaration::Class { name, .. }
            | Declaration::TypeAlias { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Property { name, .. }
            | Declaration::Constructor { name, .. }
            | Declaration::Variable { name }
            | Declaration::Package { name }
            | Declaration::TypeParameter { name } => name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Declaration::Class { class_kind, .. } => match class_kind {
                ClassKind::Interface => SymbolKind::Interface,
                ClassKind::EnumClass => SymbolKind::Enum,
                ClassKind::EnumEntry => SymbolKind::EnumMember,
                ClassKind::Class | ClassKind::Object | ClassKind::AnnotationClass => SymbolKind::Class,
            },
            Declaration::TypeAlias { .. } => SymbolKind::Class,
            Declaration::Function { .. } => SymbolKind::Function,
            Declaration::Property { .. } => SymbolKind::Field,
            Declaration::Constructor { .. } => SymbolKind::Constructor,
            Declaration::Variable { .. } => SymbolKind::Variable,
            Declaration::Package { .. } => SymbolKind::Module,
            Declaration::TypeParameter { .. } => SymbolKind::Unknown,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Declaration::Class { visibility, .. }
            | Declaration::TypeAlias { visibility, .. }
            | Declaration::Function { visibility, .. }
            | Declaration::Property { visibility, .. }
            | Declaration::Constructor { visibility, .. } => *visibility,
            Declaration::Package { .. } => Visibility::Public,
            Declaration::Variable { .. } | Declaration::TypeParameter { .. } => Visibility::Unknown,
        }
    }

    /// Receiver type for extension functions and properties
    pub fn receiver_type(&self) -> Option<&QualifiedName> {
        match self {
            Declaration::Function { receiver, .. } | Declaration::Property { receiver, .. } => {
                receiver.as_ref()
            }
            Declaration::Class { .. }
            | Declaration::TypeAlias { .. }
            | Declaration::Constructor { .. }
            | Declaration::Variable { .. }
            | Declaration::Package { .. }
            | Declaration::TypeParameter { .. } => None,
        }
    }

    /// Flatten into the indexed representation
    pub fn to_symbol(&self) -> Symbol {
        Symbol {
            name: self.qualified_name().clone(),
            kind: self.kind(),
            visibility: self.visibility(),
            receiver_type: self.receiver_type().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::new(s).unwrap()
    }

    #[test]
    fn test_class_kinds() {
        let class = |class_kind| Declaration::Class {
            name: qn("pkg.Foo"),
            class_kind,
            visibility: Visibility::Public,
        };
        assert_eq!(class(ClassKind::Class).kind(), SymbolKind::Class);
        assert_eq!(class(ClassKind::Object).kind(), SymbolKind::Class);
        assert_eq!(class(ClassKind::Interface).kind(), SymbolKind::Interface);
        assert_eq!(class(ClassKind::EnumClass).kind(), SymbolKind::Enum);
        assert_eq!(class(ClassKind::EnumEntry).kind(), SymbolKind::EnumMember);
    }

    #[test]
    fn test_extension_function_to_symbol() {
        let decl = Declaration::Function {
            name: qn("pkg.Foo.bar"),
            visibility: Visibility::Internal,
            receiver: Some(qn("pkg.Baz")),
        };
        let symbol = decl.to_symbol();
        assert_eq!(symbol.kind, SymbolKind::Function);
        assert_eq!(symbol.visibility, Visibility::Internal);
        assert_eq!(symbol.receiver_type, Some(qn("pkg.Baz")));
    }

    #[test]
    fn test_untyped_declarations() {
        let var = Declaration::Variable { name: qn("pkg.x") };
        assert_eq!(var.kind(), SymbolKind::Variable);
        assert_eq!(var.visibility(), Visibility::Unknown);
        assert!(var.receiver_type().is_none());

        let package = Declaration::Package { name: qn("pkg.sub") };
        assert_eq!(package.kind(), SymbolKind::Module);
        assert_eq!(package.visibility(), Visibility::Public);
    }

    #[test]
    fn test_deserialize_tagged() {
        let decl: Declaration = serde_json::from_str(
            r#"{"kind": "property", "name": "pkg.size", "receiver": "pkg.Baz"}"#,
        )
        .unwrap();
        assert_eq!(decl.kind(), SymbolKind::Field);
        assert_eq!(decl.kind(), "property".parse::<SymbolKind>().unwrap());
        assert_eq!(decl.visibility(), Visibility::Public);
        assert_eq!(decl.receiver_type(), Some(&qn("pkg.Baz")));
    }
}
