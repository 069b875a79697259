//! Snapshot write sets
//!
//! A snapshot is everything one refresh writes: the qualified name rows and
//! the symbol rows that reference them. It is assembled off to the side and
//! handed to `SymbolStore::replace_all` in one piece.

use std::collections::HashSet;

use crate::model::Declaration;
use crate::name::QualifiedName;
use crate::symbol::Symbol;

/// The complete set of rows produced by one refresh
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    /// Qualified name rows, in first-seen order
    pub names: Vec<QualifiedName>,
    /// Symbol rows, in declaration order
    pub symbols: Vec<Symbol>,
}

impl Snapshot {
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut builder = SnapshotBuilder::new();
        for symbol in symbols {
            builder.add_symbol(symbol);
        }
        builder.build()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Accumulates symbols while keeping both write sets consistent.
///
/// Every symbol name and receiver type gets exactly one name row. A symbol
/// whose qualified name was already added (an overload) is dropped; the first
/// one wins.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    names: Vec<QualifiedName>,
    seen_names: HashSet<QualifiedName>,
    symbols: Vec<Symbol>,
    seen_symbols: HashSet<QualifiedName>,
    duplicates: usize,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and add a declaration
    pub fn add_declaration(&mut self, declaration: &Declaration) -> bool {
        self.add_symbol(declaration.to_symbol())
    }

    /// Add a symbol; returns `false` if its name was already present
    pub fn add_symbol(&mut self, symbol: Symbol) -> bool {
        if !self.seen_symbols.insert(symbol.name.clone()) {
            self.duplicates += 1;
            return false;
        }

        self.add_name(&symbol.name);
        if let Some(receiver) = &symbol.receiver_type {
            self.add_name(receiver);
        }
        self.symbols.push(symbol);
        true
    }

    fn add_name(&mut self, name: &QualifiedName) {
        if self.seen_names.insert(name.clone()) {
            self.names.push(name.clone());
        }
    }

    /// Symbols dropped because their qualified name repeated
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn build(self) -> Snapshot {
        Snapshot {
            names: self.names,
            symbols: self.symbols,
        }
    }
}
