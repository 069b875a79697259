//! Semantic Model - the source of declarations
//!
//! The index never parses code itself. It consumes a `SemanticModel` that can:
//! 1. List the direct sub-namespaces of a namespace
//! 2. Return the declarations directly contained in a namespace
//!
//! Classification of each declaration lives on `Declaration` itself.
//! `ManifestModel` is an in-memory model loaded from a TOML or JSON file.

pub mod declaration;
pub mod manifest;
pub mod namespaces;

pub use declaration::{ClassKind, Declaration};
pub use manifest::{ManifestModel, NamespaceEntry};
pub use namespaces::{all_namespaces, NamespaceWalk};

use crate::name::QualifiedName;
use crate::Result;

/// Trait for semantic models the index can be refreshed from
///
/// Implementations are queried from a background refresh thread, so they
/// must be shareable across threads.
pub trait SemanticModel: Send + Sync {
    /// Direct children of `namespace`; the root is `QualifiedName::root()`
    fn sub_namespaces(&self, namespace: &QualifiedName) -> Result<Vec<QualifiedName>>;

    /// Declarations directly contained in `namespace`
    ///
    /// May fail for a single namespace without the model being unusable.
    fn declarations_of(&self, namespace: &QualifiedName) -> Result<Vec<Declaration>>;
}
