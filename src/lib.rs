//! # Symdex - Global Symbol Index
//!
//! A queryable index of named declarations for prefix-based completion.
//!
//! Symdex provides:
//! - A flat, SQLite-backed snapshot of every declaration in a semantic model
//! - Wholesale, transactional rebuilds that tolerate per-namespace failures
//! - Short-name prefix queries filtered by exact extension-receiver type
//! - A manifest-backed model for driving the index from the command line

pub mod name;
pub mod symbol;
pub mod model;
pub mod storage;
pub mod query;
pub mod index;
pub mod progress;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use name::QualifiedName;
pub use symbol::{Symbol, SymbolKind, Visibility};
pub use model::{Declaration, ManifestModel, SemanticModel};
pub use storage::{Snapshot, SnapshotBuilder, SymbolStore};
pub use query::{QueryEngine, SymbolQuery};
pub use index::{RefreshStats, SymbolIndex};
pub use progress::{ProgressHandle, ProgressSink};

/// Result type alias for Symdex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Symdex operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid qualified name: {0}")]
    InvalidName(String),

    #[error("Unknown symbol kind: {0}")]
    UnknownKind(String),

    #[error("Unknown visibility: {0}")]
    UnknownVisibility(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Failed to read namespace {namespace}: {message}")]
    Namespace { namespace: String, message: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
