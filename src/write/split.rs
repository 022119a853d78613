//! Statement splitting for multi-statement write payloads.

/// Statement separator.
pub const SEPARATOR: char = ';';

/// Splits a raw payload into trimmed, non-empty statements.
///
/// Splitting is done on the literal `;` only. Quoted semicolons are not
/// recognized, so `INSERT INTO t VALUES ('a;b')` becomes two statements.
///
/// # Examples
///
/// ```
/// use mcp_sqlite::write::split_statements;
///
/// let stmts = split_statements("INSERT INTO t VALUES (1);  ; DELETE FROM t ;");
/// assert_eq!(stmts, vec!["INSERT INTO t VALUES (1)", "DELETE FROM t"]);
/// ```
pub fn split_statements(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(ToString::to_string)
        .collect()
}
