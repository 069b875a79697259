//! Manifest-backed semantic model
//!
//! Describes namespaces and their declarations in a TOML or JSON file:
//!
//! ```toml
//! [[namespaces]]
//! name = "pkg"
//! declarations = [
//!     { kind = "class", name = "pkg.Foo" },
//!     { kind = "function", name = "pkg.Foo.bar", receiver = "pkg.Baz" },
//! ]
//!
//! [[namespaces]]
//! name = "pkg.broken"
//! error = "descriptor resolution failed"
//! ```
//!
//! Intermediate namespaces (`com` for `com.example`) are created implicitly.
//! A namespace with an `error` fails on declaration retrieval.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Declaration, SemanticModel};
use crate::name::QualifiedName;
use crate::{Error, Result};

/// One namespace in a manifest file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub name: QualifiedName,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// When set, retrieving declarations of this namespace fails with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    namespaces: Vec<NamespaceEntry>,
}

/// In-memory semantic model built from namespace entries
#[derive(Debug, Default, Clone)]
pub struct ManifestModel {
    children: HashMap<QualifiedName, Vec<QualifiedName>>,
    entries: HashMap<QualifiedName, NamespaceEntry>,
}

impl ManifestModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest file; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).map_err(|e| Error::Manifest(e.to_string()))?;
        Ok(Self::from_entries(manifest.namespaces))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(contents).map_err(|e| Error::Manifest(e.to_string()))?;
        Ok(Self::from_entries(manifest.namespaces))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = NamespaceEntry>) -> Self {
        let mut model = Self::new();
        for entry in entries {
            model.insert(entry);
        }
        model
    }

    /// Add a namespace with its declarations
    pub fn with_namespace(mut self, name: QualifiedName, declarations: Vec<Declaration>) -> Self {
        self.insert(NamespaceEntry {
            name,
            declarations,
            error: None,
        });
        self
    }

    /// Add a namespace whose declaration retrieval fails
    pub fn with_failing_namespace(mut self, name: QualifiedName, message: impl Into<String>) -> Self {
        self.insert(NamespaceEntry {
            name,
            declarations: Vec::new(),
            error: Some(message.into()),
        });
        self
    }

    /// Number of namespaces, including implicit intermediate ones
    pub fn namespace_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    fn insert(&mut self, entry: NamespaceEntry) {
        self.link(&entry.name);
        match self.entries.get_mut(&entry.name) {
            Some(existing) => {
                existing.declarations.extend(entry.declarations);
                if entry.error.is_some() {
                    existing.error = entry.error;
                }
            }
            None => {
                self.entries.insert(entry.name.clone(), entry);
            }
        }
    }

    /// Register `name` and all of its ancestors in the namespace tree
    fn link(&mut self, name: &QualifiedName) {
        let mut current = name.clone();
        while let Some(parent) = current.parent() {
            let siblings = self.children.entry(parent.clone()).or_default();
            if siblings.contains(&current) {
                break;
            }
            siblings.push(current);
            current = parent;
        }
    }
}

impl SemanticModel for ManifestModel {
    fn sub_namespaces(&self, namespace: &QualifiedName) -> Result<Vec<QualifiedName>> {
        Ok(self.children.get(namespace).cloned().unwrap_or_default())
    }

    fn declarations_of(&self, namespace: &QualifiedName) -> Result<Vec<Declaration>> {
        match self.entries.get(namespace) {
            Some(NamespaceEntry { error: Some(message), .. }) => Err(Error::Namespace {
                namespace: namespace.to_string(),
                message: message.clone(),
            }),
            Some(entry) => Ok(entry.declarations.clone()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::new(s).unwrap()
    }

    const MANIFEST: &str = r#"
[[namespaces]]
name = "com.example"
declarations = [
    { kind = "class", name = "com.example.Foo" },
    { kind = "function", name = "com.example.Foo.bar", receiver = "com.example.Baz" },
]

[[namespaces]]
name = "com.broken"
error = "boom"
"#;

    #[test]
    fn test_toml_manifest_builds_tree() {
        let model = ManifestModel::from_toml_str(MANIFEST).unwrap();

        assert_eq!(model.sub_namespaces(&QualifiedName::root()).unwrap(), vec![qn("com")]);
        assert_eq!(
            model.sub_namespaces(&qn("com")).unwrap(),
            vec![qn("com.example"), qn("com.broken")]
        );
        assert!(model.sub_namespaces(&qn("com.example")).unwrap().is_empty());
        assert_eq!(model.namespace_count(), 3);

        let decls = model.declarations_of(&qn("com.example")).unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].kind(), SymbolKind::Function);
    }

    #[test]
    fn test_failing_namespace() {
        let model = ManifestModel::from_toml_str(MANIFEST).unwrap();
        let err = model.declarations_of(&qn("com.broken")).unwrap_err();
        assert!(matches!(err, Error::Namespace { .. }));
        assert!(model.declarations_of(&qn("com")).unwrap().is_empty());
    }

    #[test]
    fn test_json_manifest() {
        let model = ManifestModel::from_json_str(
            r#"{"namespaces": [{"name": "pkg", "declarations": [{"kind": "type_alias", "name": "pkg.Alias"}]}]}"#,
        )
        .unwrap();
        let decls = model.declarations_of(&qn("pkg")).unwrap();
        assert_eq!(decls[0].kind(), SymbolKind::Class);
    }

    #[test]
    fn test_invalid_manifest() {
        let err = ManifestModel::from_toml_str("[[namespaces]]\nname = \"a..b\"\n").unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let model = ManifestModel::load(&path).unwrap();
        assert_eq!(model.declarations_of(&qn("com.example")).unwrap().len(), 2);
    }
}
