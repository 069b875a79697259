pub mod engine;

pub use engine::{QueryEngine, SymbolQuery, DEFAULT_LIMIT};
