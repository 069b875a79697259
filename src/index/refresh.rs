//! Refresh pipeline
//!
//! enumerate namespaces → collect declarations → classify → replace store
//!
//! Nothing touches the store until the whole snapshot has been built, and
//! the snapshot is written in a single transaction.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::model::{Declaration, NamespaceWalk, SemanticModel};
use crate::name::QualifiedName;
use crate::progress::ProgressGuard;
use crate::storage::{SnapshotBuilder, SymbolStore};
use crate::{Error, Result};

/// Outcome of a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RefreshStats {
    pub namespaces: usize,
    /// Namespaces whose declarations could not be retrieved
    pub failed_namespaces: usize,
    pub declarations: usize,
    pub symbols: usize,
    /// Declarations dropped because their qualified name repeated
    pub duplicates: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl std::fmt::Display for RefreshStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} symbols from {} namespaces ({} failed, {} duplicates) in {:?}",
            self.symbols, self.namespaces, self.failed_namespaces, self.duplicates, self.elapsed
        )
    }
}

pub(crate) struct RefreshPipeline<'a> {
    store: &'a SymbolStore,
    walk: &'a NamespaceWalk,
}

impl<'a> RefreshPipeline<'a> {
    pub(crate) fn new(store: &'a SymbolStore, walk: &'a NamespaceWalk) -> Self {
        Self { store, walk }
    }

    pub(crate) fn run(&self, model: &dyn SemanticModel, progress: &mut ProgressGuard) -> Result<RefreshStats> {
        let started = Instant::now();
        let namespaces = self.walk.collect(model)?;
        tracing::info!("Indexing {} namespaces", namespaces.len());

        let mut builder = SnapshotBuilder::new();
        let mut failed_namespaces = 0;
        let mut declarations = 0;

        for namespace in &namespaces {
            progress.report(namespace.as_str());
            match declarations_of(model, namespace) {
                Ok(decls) => {
                    declarations += decls.len();
                    for decl in &decls {
                        builder.add_declaration(decl);
                    }
                }
                Err(e) => {
                    failed_namespaces += 1;
                    tracing::warn!("Skipping namespace {} while indexing: {}", namespace, e);
                }
            }
        }

        let duplicates = builder.duplicates();
        let snapshot = builder.build();
        self.store.replace_all(&snapshot)?;

        Ok(RefreshStats {
            namespaces: namespaces.len(),
            failed_namespaces,
            declarations,
            symbols: snapshot.symbols.len(),
            duplicates,
            elapsed: started.elapsed(),
        })
    }
}

/// Declarations of one namespace, with a panic inside the model turned into an error
fn declarations_of(model: &dyn SemanticModel, namespace: &QualifiedName) -> Result<Vec<Declaration>> {
    panic::catch_unwind(AssertUnwindSafe(|| model.declarations_of(namespace)))
        .unwrap_or_else(|payload| Err(Error::Model(panic_message(payload.as_ref()))))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
