//! Storage Layer - SQLite-backed symbol snapshot
//!
//! The store is an in-memory SQLite database with tables:
//! - qualified_names(fq_name, short_name)
//! - symbols(fq_name, kind, visibility, receiver_type)
//!
//! Both tables are replaced together, in one transaction, on every refresh.

pub mod schema;
pub mod snapshot;
pub mod sqlite;

pub use snapshot::{Snapshot, SnapshotBuilder};
pub use sqlite::{StoreStats, SymbolFilter, SymbolStore};
