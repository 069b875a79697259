//! Query engine implementation
//!
//! Completion lookups against the committed snapshot:
//! - Short-name prefix match (literal, case-sensitive)
//! - Exact extension-receiver match, where "no receiver" only matches
//!   declarations that are not extensions
//! - Result cap, storage order

use crate::Result;
use crate::name::QualifiedName;
use crate::storage::{SymbolFilter, SymbolStore};
use crate::symbol::Symbol;

/// Result cap used when a query does not set one
pub const DEFAULT_LIMIT: usize = 20;

/// A completion lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolQuery {
    pub prefix: String,
    pub receiver_type: Option<QualifiedName>,
    /// Result cap; `None` uses the caller's default
    pub limit: Option<usize>,
}

impl SymbolQuery {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            receiver_type: None,
            limit: None,
        }
    }

    /// Only match extensions declared on exactly this type
    pub fn receiver(mut self, receiver_type: QualifiedName) -> Self {
        self.receiver_type = Some(receiver_type);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query engine over a symbol store
pub struct QueryEngine<'a> {
    store: &'a SymbolStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a SymbolStore) -> Self {
        Self { store }
    }

    /// Run a completion lookup, capped at `DEFAULT_LIMIT` unless the query sets a limit
    pub fn search(&self, query: &SymbolQuery) -> Result<Vec<Symbol>> {
        self.search_with_default(query, DEFAULT_LIMIT)
    }

    /// Run a completion lookup, capped at `default_limit` unless the query sets a limit
    pub fn search_with_default(&self, query: &SymbolQuery, default_limit: usize) -> Result<Vec<Symbol>> {
        let limit = query.limit.unwrap_or(default_limit);
        self.query(&query.prefix, query.receiver_type.as_ref(), limit)
    }

    /// Symbols whose short name starts with `prefix` and whose receiver
    /// type equals `receiver_type`
    pub fn query(
        &self,
        prefix: &str,
        receiver_type: Option<&QualifiedName>,
        limit: usize,
    ) -> Result<Vec<Symbol>> {
        let filter = SymbolFilter { prefix, receiver_type };
        let symbols = self.store.query(&filter, limit)?;
        tracing::debug!(
            "Query prefix={:?} receiver={:?} returned {} symbols",
            prefix,
            receiver_type.map(QualifiedName::as_str),
            symbols.len()
        );
        Ok(symbols)
    }
}
