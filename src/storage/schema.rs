//! Database schema definitions

/// Connection settings applied before any table is created
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the qualified names table
pub const CREATE_QUALIFIED_NAMES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS qualified_names (
    fq_name TEXT PRIMARY KEY,
    short_name TEXT NOT NULL
)
"#;

/// SQL to create the symbols table
///
/// Both the symbol's own name and its receiver must exist in `qualified_names`.
pub const CREATE_SYMBOLS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS symbols (
    fq_name TEXT PRIMARY KEY REFERENCES qualified_names(fq_name) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    visibility TEXT NOT NULL,
    receiver_type TEXT REFERENCES qualified_names(fq_name) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_qualified_names_short ON qualified_names(short_name)",
    "CREATE INDEX IF NOT EXISTS idx_symbols_receiver ON symbols(receiver_type)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_QUALIFIED_NAMES_TABLE, CREATE_SYMBOLS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
