//! Namespace enumeration
//!
//! Walks the namespace tree of a model from the root and returns every
//! namespace below it exactly once, depth-first, parents before children.

use std::collections::HashSet;

use super::SemanticModel;
use crate::name::QualifiedName;
use crate::Result;

/// Configurable depth-first walk over a model's namespaces
#[derive(Debug, Clone)]
pub struct NamespaceWalk {
    excluded: Vec<QualifiedName>,
    max_depth: usize,
}

impl NamespaceWalk {
    pub fn new(excluded: Vec<QualifiedName>, max_depth: usize) -> Self {
        Self { excluded, max_depth }
    }

    /// A single-segment exclusion matches that segment at any level
    /// (`META-INF` also excludes `lib.META-INF`); a dotted one only matches
    /// that exact namespace.
    fn is_excluded(&self, namespace: &QualifiedName) -> bool {
        self.excluded.iter().any(|excluded| {
            excluded == namespace || (excluded.depth() == 1 && namespace.short_name() == excluded.as_str())
        })
    }

    /// Collect all namespaces below the root.
    ///
    /// The root itself is not part of the result. Excluded namespaces are
    /// skipped together with their subtrees. Namespaces nested deeper than
    /// `max_depth` levels are dropped with a warning.
    pub fn collect(&self, model: &dyn SemanticModel) -> Result<Vec<QualifiedName>> {
        let mut visited: HashSet<QualifiedName> = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack: Vec<(QualifiedName, usize)> = vec![(QualifiedName::root(), 0)];

        while let Some((namespace, depth)) = stack.pop() {
            if !namespace.is_root() {
                if !visited.insert(namespace.clone()) {
                    continue;
                }
                ordered.push(namespace.clone());
            }

            let children = model.sub_namespaces(&namespace)?;
            if depth >= self.max_depth {
                if !children.is_empty() {
                    tracing::warn!(
                        "Namespace {} is at maximum depth {}, skipping {} children",
                        namespace,
                        self.max_depth,
                        children.len()
                    );
                }
                continue;
            }

            // Reverse so the first child is popped first
            for child in children.into_iter().rev() {
                if self.is_excluded(&child) || visited.contains(&child) {
                    continue;
                }
                stack.push((child, depth + 1));
            }
        }

        Ok(ordered)
    }
}

/// Every namespace of `model` except those in `excluded`
pub fn all_namespaces(
    model: &dyn SemanticModel,
    excluded: &[QualifiedName],
    max_depth: usize,
) -> Result<Vec<QualifiedName>> {
    NamespaceWalk::new(excluded.to_vec(), max_depth).collect(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Declaration, ManifestModel};

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::new(s).unwrap()
    }

    fn model() -> ManifestModel {
        ManifestModel::new()
            .with_namespace(qn("a.b.c"), Vec::new())
            .with_namespace(qn("a.d"), Vec::new())
            .with_namespace(qn("META-INF.services"), Vec::new())
            .with_namespace(qn("z"), vec![Declaration::Package { name: qn("z") }])
    }

    #[test]
    fn test_visits_every_namespace_once() {
        let namespaces = all_namespaces(&model(), &[qn("META-INF")], 64).unwrap();
        assert_eq!(
            namespaces,
            vec![qn("a"), qn("a.b"), qn("a.b.c"), qn("a.d"), qn("z")]
        );
    }

    #[test]
    fn test_excluded_subtree_is_skipped() {
        let namespaces = all_namespaces(&model(), &[qn("META-INF")], 64).unwrap();
        assert!(!namespaces.iter().any(|ns| ns.as_str().starts_with("META-INF")));

        let with_meta = all_namespaces(&model(), &[], 64).unwrap();
        assert!(with_meta.contains(&qn("META-INF.services")));
    }

    #[test]
    fn test_excluded_segment_matches_at_any_level() {
        let model = model()
            .with_namespace(qn("lib.META-INF.maven"), Vec::new())
            .with_namespace(qn("lib.api"), Vec::new())
            .with_namespace(qn("x.y"), Vec::new());

        let namespaces = all_namespaces(&model, &[qn("META-INF"), qn("x.y")], 64).unwrap();
        assert!(namespaces.contains(&qn("lib.api")));
        assert!(!namespaces.iter().any(|ns| ns.as_str().contains("META-INF")));
        assert!(namespaces.contains(&qn("x")));
        assert!(!namespaces.contains(&qn("x.y")));
    }

    #[test]
    fn test_depth_guard() {
        let namespaces = all_namespaces(&model(), &[], 2).unwrap();
        assert!(namespaces.contains(&qn("a.b")));
        assert!(!namespaces.contains(&qn("a.b.c")));
    }

    struct DiamondModel;

    impl SemanticModel for DiamondModel {
        fn sub_namespaces(&self, namespace: &QualifiedName) -> Result<Vec<QualifiedName>> {
            Ok(match namespace.as_str() {
                "" => vec![qn("left"), qn("right")],
                "left" | "right" => vec![qn("shared")],
                _ => Vec::new(),
            })
        }

        fn declarations_of(&self, _namespace: &QualifiedName) -> Result<Vec<Declaration>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_duplicates_removed() {
        let namespaces = all_namespaces(&DiamondModel, &[], 64).unwrap();
        assert_eq!(namespaces, vec![qn("left"), qn("shared"), qn("right")]);
    }
}
