//! Leading-keyword classification of write statements.

use serde::Serialize;
use std::fmt;

/// Kind of a recognized write or transaction-control statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
    Begin,
    Commit,
    Rollback,
}

impl OperationKind {
    /// All kinds, in matching order.
    pub const ALL: [OperationKind; 6] = [
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::Begin,
        Self::Commit,
        Self::Rollback,
    ];

    /// The SQL keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }

    /// Returns true for statements that modify rows.
    pub fn is_data_change(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Classifies a statement by its leading keyword.
///
/// Matching is case-insensitive and requires a word boundary after the
/// keyword, so `INSERTED_ROWS ...` is not an `INSERT`. Returns `None` for
/// anything that is not one of the six recognized kinds.
///
/// # Examples
///
/// ```
/// use mcp_sqlite::write::{OperationKind, classify};
///
/// assert_eq!(classify("insert into t values (1)"), Some(OperationKind::Insert));
/// assert_eq!(classify("SELECT 1"), None);
/// ```
pub fn classify(statement: &str) -> Option<OperationKind> {
    let upper = statement.trim().to_uppercase();

    OperationKind::ALL.into_iter().find(|kind| {
        upper
            .strip_prefix(kind.keyword())
            .is_some_and(|rest| !rest.starts_with(is_identifier_char))
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_any_case() {
        assert_eq!(classify("insert into t values (1)"), Some(OperationKind::Insert));
        assert_eq!(classify("Update t SET x = 1"), Some(OperationKind::Update));
        assert_eq!(classify("DELETE FROM t"), Some(OperationKind::Delete));
    }

    #[test]
    fn test_classify_transaction_control() {
        assert_eq!(classify("BEGIN"), Some(OperationKind::Begin));
        assert_eq!(classify("begin transaction"), Some(OperationKind::Begin));
        assert_eq!(classify("COMMIT"), Some(OperationKind::Commit));
        assert_eq!(classify("rollback"), Some(OperationKind::Rollback));
    }

    #[test]
    fn test_classify_leading_whitespace() {
        assert_eq!(classify("\n\t  insert into t values (1)"), Some(OperationKind::Insert));
    }

    #[test]
    fn test_classify_rejects_reads_and_ddl() {
        assert_eq!(classify("SELECT 1"), None);
        assert_eq!(classify("CREATE TABLE t (id INTEGER)"), None);
        assert_eq!(classify("DROP TABLE t"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_classify_requires_word_boundary() {
        assert_eq!(classify("INSERTED_ROWS"), None);
        assert_eq!(classify("BEGINNING"), None);
        assert_eq!(classify("COMMIT;"), Some(OperationKind::Commit));
        assert_eq!(classify("DELETE\nFROM t"), Some(OperationKind::Delete));
        assert_eq!(classify("INSERT(x)"), Some(OperationKind::Insert));
    }

    #[test]
    fn test_kind_display_matches_keyword() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.to_string(), kind.keyword());
            assert_eq!(classify(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn test_is_data_change() {
        assert!(OperationKind::Insert.is_data_change());
        assert!(OperationKind::Delete.is_data_change());
        assert!(!OperationKind::Begin.is_data_change());
        assert!(!OperationKind::Rollback.is_data_change());
    }
}
