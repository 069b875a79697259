//! Symbol Index - refresh and query entry points
//!
//! `SymbolIndex` owns the store and the progress sink. Refreshes rebuild the
//! whole snapshot and never fail from the caller's point of view; queries
//! read whatever snapshot was last committed.

mod refresh;

pub use refresh::RefreshStats;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::SymdexConfig;
use crate::model::{NamespaceWalk, SemanticModel};
use crate::name::QualifiedName;
use crate::progress::{NoProgress, ProgressGuard, ProgressSink};
use crate::query::{QueryEngine, SymbolQuery};
use crate::storage::{StoreStats, SymbolStore};
use crate::symbol::Symbol;
use crate::Result;
use refresh::{panic_message, RefreshPipeline};

/// Label of the progress handle opened for every refresh
pub const REFRESH_LABEL: &str = "Indexing";

pub struct SymbolIndex {
    store: SymbolStore,
    progress: Arc<dyn ProgressSink>,
    walk: NamespaceWalk,
    query_limit: usize,
}

impl SymbolIndex {
    pub fn new(config: &SymdexConfig, progress: Arc<dyn ProgressSink>) -> Result<Self> {
        Ok(Self {
            store: SymbolStore::open_in_memory()?,
            progress,
            walk: NamespaceWalk::new(config.excluded_namespaces()?, config.max_namespace_depth),
            query_limit: config.query_limit,
        })
    }

    /// Default configuration, no progress reporting
    pub fn in_memory() -> Result<Self> {
        Self::new(&SymdexConfig::default(), Arc::new(NoProgress))
    }

    /// Rebuild the index from `model`.
    ///
    /// Errors and panics are logged and swallowed; the previous snapshot then
    /// stays in place. The progress handle is closed in every case.
    pub fn refresh(&self, model: &dyn SemanticModel) -> Option<RefreshStats> {
        let mut progress = self.start_progress();
        let pipeline = RefreshPipeline::new(&self.store, &self.walk);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(model, &mut progress)));
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| progress.close())) {
            tracing::warn!("Panic while closing progress: {}", panic_message(payload.as_ref()));
        }

        match outcome {
            Ok(Ok(stats)) => {
                tracing::info!("Updated symbol index: {}", stats);
                Some(stats)
            }
            Ok(Err(e)) => {
                tracing::error!("Error while updating symbol index: {}", e);
                None
            }
            Err(payload) => {
                tracing::error!("Panic while updating symbol index: {}", panic_message(payload.as_ref()));
                None
            }
        }
    }

    /// Open the refresh progress handle; a panicking sink leaves the refresh unreported
    fn start_progress(&self) -> ProgressGuard {
        panic::catch_unwind(AssertUnwindSafe(|| ProgressGuard::start(self.progress.as_ref(), REFRESH_LABEL)))
            .unwrap_or_else(|payload| {
                tracing::warn!("Panic while starting progress: {}", panic_message(payload.as_ref()));
                ProgressGuard::detached()
            })
    }

    /// Run `refresh` on a dedicated thread
    pub fn refresh_in_background(
        self: &Arc<Self>,
        model: Arc<dyn SemanticModel>,
    ) -> Result<JoinHandle<Option<RefreshStats>>> {
        let index = Arc::clone(self);
        let handle = thread::Builder::new()
            .name("symdex-refresh".to_string())
            .spawn(move || index.refresh(model.as_ref()))?;
        Ok(handle)
    }

    /// Completion candidates for `prefix`.
    ///
    /// `receiver_type` must match exactly; `None` only returns symbols that
    /// are not extensions. `limit` falls back to the configured query limit.
    pub fn query(
        &self,
        prefix: &str,
        receiver_type: Option<&QualifiedName>,
        limit: Option<usize>,
    ) -> Result<Vec<Symbol>> {
        QueryEngine::new(&self.store).query(prefix, receiver_type, limit.unwrap_or(self.query_limit))
    }

    /// Run a `SymbolQuery`; an unset limit falls back to the configured query limit
    pub fn search(&self, query: &SymbolQuery) -> Result<Vec<Symbol>> {
        QueryEngine::new(&self.store).search_with_default(query, self.query_limit)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    pub fn store(&self) -> &SymbolStore {
        &self.store
    }
}
