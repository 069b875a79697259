//! SQLite storage implementation

use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection};

use super::schema;
use super::snapshot::Snapshot;
use crate::name::QualifiedName;
use crate::symbol::{Symbol, SymbolKind, Visibility};
use crate::{Error, Result};

/// Row predicate for symbol lookups
#[derive(Debug, Clone, Copy)]
pub struct SymbolFilter<'a> {
    /// Literal, case-sensitive prefix of the short name
    pub prefix: &'a str,
    /// Receiver type that must match exactly; `None` matches only non-extensions
    pub receiver_type: Option<&'a QualifiedName>,
}

/// In-memory SQLite store for the current symbol snapshot
///
/// The connection sits behind a mutex. `replace_all` holds it for the whole
/// transaction, so readers see either the previous or the next snapshot.
pub struct SymbolStore {
    conn: Mutex<Connection>,
}

impl SymbolStore {
    /// Open an empty in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(schema::PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// A panic while holding the lock leaves no partial writes behind: the
    /// open transaction was rolled back when it was dropped.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========== Snapshot Operations ==========

    /// Replace every row with the contents of `snapshot`.
    ///
    /// All-or-nothing: on error the transaction is rolled back and the
    /// previous snapshot stays in place.
    pub fn replace_all(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM symbols", [])?;
        tx.execute("DELETE FROM qualified_names", [])?;

        {
            let mut insert_name = tx.prepare_cached(
                r#"
                INSERT INTO qualified_names (fq_name, short_name)
                VALUES (?1, ?2)
                ON CONFLICT(fq_name) DO UPDATE SET short_name = excluded.short_name
                "#,
            )?;
            for name in &snapshot.names {
                insert_name.execute(params![name.as_str(), name.short_name()])?;
            }

            let mut insert_symbol = tx.prepare_cached(
                r#"
                INSERT INTO symbols (fq_name, kind, visibility, receiver_type)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for symbol in &snapshot.symbols {
                insert_symbol.execute(params![
                    symbol.name.as_str(),
                    symbol.kind.as_str(),
                    symbol.visibility.as_str(),
                    symbol.receiver_type.as_ref().map(QualifiedName::as_str),
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Symbols matching `filter`, in storage order, at most `limit` of them
    pub fn query(&self, filter: &SymbolFilter<'_>, limit: usize) -> Result<Vec<Symbol>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            r#"
            SELECT s.fq_name, s.kind, s.visibility, s.receiver_type
            FROM symbols s
            JOIN qualified_names q ON q.fq_name = s.fq_name
            WHERE q.short_name GLOB ?1 AND s.receiver_type IS ?2
            ORDER BY s.rowid
            LIMIT ?3
            "#,
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let symbols = stmt
            .query_map(
                params![
                    glob_prefix_pattern(filter.prefix),
                    filter.receiver_type.map(QualifiedName::as_str),
                    limit,
                ],
                row_to_symbol,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(symbols)
    }

    /// Count all symbols
    pub fn count_symbols(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM symbols", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all qualified name rows
    pub fn count_names(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM qualified_names", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get store statistics, all counted from the same snapshot
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock();
        let (symbols, names, extensions): (i64, i64, i64) = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM symbols),
                (SELECT COUNT(*) FROM qualified_names),
                (SELECT COUNT(*) FROM symbols WHERE receiver_type IS NOT NULL)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(StoreStats {
            symbols: symbols as usize,
            names: names as usize,
            extensions: extensions as usize,
        })
    }
}

/// Helper to convert a row to a Symbol
fn row_to_symbol(row: &rusqlite::Row) -> rusqlite::Result<Symbol> {
    let name_str: String = row.get(0)?;
    let kind_str: String = row.get(1)?;
    let visibility_str: String = row.get(2)?;
    let receiver_str: Option<String> = row.get(3)?;

    let name = QualifiedName::new(name_str).map_err(|e| conversion_failure(0, e))?;
    let kind: SymbolKind = kind_str.parse().map_err(|e: Error| conversion_failure(1, e))?;
    let visibility: Visibility = visibility_str
        .parse()
        .map_err(|e: Error| conversion_failure(2, e))?;
    let receiver_type = receiver_str
        .map(QualifiedName::new)
        .transpose()
        .map_err(|e| conversion_failure(3, e))?;

    Ok(Symbol {
        name,
        kind,
        visibility,
        receiver_type,
    })
}

fn conversion_failure(column: usize, error: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(error))
}

/// GLOB pattern matching `prefix` literally at the start of a string.
///
/// GLOB is case-sensitive; its metacharacters are wrapped in brackets.
fn glob_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        match c {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub symbols: usize,
    pub names: usize,
    pub extensions: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Index Statistics:")?;
        writeln!(f, "  Symbols: {}", self.symbols)?;
        writeln!(f, "  Qualified names: {}", self.names)?;
        writeln!(f, "  Extensions: {}", self.extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::new(s).unwrap()
    }

    fn class(name: &str) -> Symbol {
        Symbol::new(qn(name), SymbolKind::Class, Visibility::Public)
    }

    fn extension(name: &str, receiver: &str) -> Symbol {
        Symbol::new(qn(name), SymbolKind::Function, Visibility::Public).with_receiver(qn(receiver))
    }

    fn filter<'a>(prefix: &'a str, receiver_type: Option<&'a QualifiedName>) -> SymbolFilter<'a> {
        SymbolFilter { prefix, receiver_type }
    }

    fn names(symbols: &[Symbol]) -> Vec<&str> {
        symbols.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_replace_and_query() {
        let store = SymbolStore::open_in_memory().unwrap();
        store
            .replace_all(&Snapshot::from_symbols([class("pkg.Foo"), extension("pkg.Foo.bar", "pkg.Baz")]))
            .unwrap();

        assert_eq!(store.count_symbols().unwrap(), 2);
        assert_eq!(store.count_names().unwrap(), 3);

        let found = store.query(&filter("Fo", None), 20).unwrap();
        assert_eq!(names(&found), vec!["pkg.Foo"]);
        assert_eq!(found[0].kind, SymbolKind::Class);

        let baz = qn("pkg.Baz");
        let found = store.query(&filter("ba", Some(&baz)), 20).unwrap();
        assert_eq!(names(&found), vec!["pkg.Foo.bar"]);
        assert_eq!(found[0].receiver_type, Some(baz));

        assert!(store.query(&filter("ba", None), 20).unwrap().is_empty());
    }

    #[test]
    fn test_replace_discards_previous_rows() {
        let store = SymbolStore::open_in_memory().unwrap();
        store.replace_all(&Snapshot::from_symbols([class("old.Thing")])).unwrap();
        store.replace_all(&Snapshot::from_symbols([class("new.Thing")])).unwrap();

        let found = store.query(&filter("Thing", None), 20).unwrap();
        assert_eq!(names(&found), vec!["new.Thing"]);
        assert_eq!(store.count_names().unwrap(), 1);
    }

    #[test]
    fn test_failed_replace_keeps_previous_snapshot() {
        let store = SymbolStore::open_in_memory().unwrap();
        store.replace_all(&Snapshot::from_symbols([class("pkg.Foo")])).unwrap();

        // Receiver without a name row violates the foreign key mid-write
        let broken = Snapshot {
            names: vec![qn("pkg.Other")],
            symbols: vec![class("pkg.Other"), extension("pkg.ext", "pkg.Missing")],
        };
        let err = store.replace_all(&broken).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        let found = store.query(&filter("", None), 20).unwrap();
        assert_eq!(names(&found), vec!["pkg.Foo"]);
    }

    #[test]
    fn test_prefix_is_literal_and_case_sensitive() {
        let store = SymbolStore::open_in_memory().unwrap();
        store
            .replace_all(&Snapshot::from_symbols([
                class("pkg.foo"),
                class("pkg.Foo"),
                class("pkg.a_b"),
                class("pkg.axb"),
                class("pkg.`x*y`"),
            ]))
            .unwrap();

        assert_eq!(names(&store.query(&filter("foo", None), 20).unwrap()), vec!["pkg.foo"]);
        assert_eq!(names(&store.query(&filter("a_", None), 20).unwrap()), vec!["pkg.a_b"]);
        assert!(store.query(&filter("a%", None), 20).unwrap().is_empty());
        assert_eq!(names(&store.query(&filter("`x*", None), 20).unwrap()), vec!["pkg.`x*y`"]);
        assert!(store.query(&filter("`x?", None), 20).unwrap().is_empty());
    }

    #[test]
    fn test_limit_and_order() {
        let store = SymbolStore::open_in_memory().unwrap();
        let symbols: Vec<Symbol> = (0..30).map(|i| class(&format!("pkg.Item{i}"))).collect();
        store.replace_all(&Snapshot::from_symbols(symbols)).unwrap();

        let found = store.query(&filter("Item", None), 5).unwrap();
        assert_eq!(names(&found), vec!["pkg.Item0", "pkg.Item1", "pkg.Item2", "pkg.Item3", "pkg.Item4"]);
        assert!(store.query(&filter("Item", None), 0).unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let store = SymbolStore::open_in_memory().unwrap();
        store
            .replace_all(&Snapshot::from_symbols([class("pkg.Baz"), extension("pkg.ext", "pkg.Baz")]))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats, StoreStats { symbols: 2, names: 2, extensions: 1 });
    }

    #[test]
    fn test_stats_come_from_one_snapshot() {
        let store = SymbolStore::open_in_memory().unwrap();
        let small = Snapshot::from_symbols([class("a.One")]);
        let large = Snapshot::from_symbols([
            class("b.Base"),
            extension("b.first", "b.Base"),
            extension("b.second", "b.Base"),
        ]);
        store.replace_all(&small).unwrap();

        let small_stats = StoreStats { symbols: 1, names: 1, extensions: 0 };
        let large_stats = StoreStats { symbols: 3, names: 3, extensions: 2 };

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..50 {
                    let snapshot = if round % 2 == 0 { &large } else { &small };
                    store.replace_all(snapshot).unwrap();
                }
            });
            for _ in 0..200 {
                let stats = store.stats().unwrap();
                assert!(stats == small_stats || stats == large_stats, "mixed stats {stats:?}");
            }
        });
    }
}
