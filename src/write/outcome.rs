//! Per-statement outcome records and the aggregated write report.

use serde::Serialize;

use super::classify::OperationKind;
use super::error::WriteError;

/// Result of one attempted statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    /// The trimmed statement as submitted.
    pub statement: String,
    pub kind: OperationKind,
    pub succeeded: bool,
    /// Rows changed; always 0 for transaction control.
    pub rows_affected: u64,
    /// Generated row id of a successful `INSERT`, when the database reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i64>,
    /// Present iff `succeeded` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl StatementOutcome {
    pub(crate) fn succeeded(statement: &str, kind: OperationKind) -> Self {
        Self {
            statement: statement.to_string(),
            kind,
            succeeded: true,
            rows_affected: 0,
            last_insert_id: None,
            failure_reason: None,
        }
    }

    pub(crate) fn changed(statement: &str, kind: OperationKind, summary: ExecSummary) -> Self {
        Self {
            rows_affected: summary.rows_affected,
            last_insert_id: summary
                .last_insert_id
                .filter(|_| kind == OperationKind::Insert),
            ..Self::succeeded(statement, kind)
        }
    }

    pub(crate) fn failed(statement: &str, kind: OperationKind, reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            failure_reason: Some(reason.into()),
            ..Self::succeeded(statement, kind)
        }
    }
}

/// What the database reports after executing one data statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecSummary {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// Outcomes of a write invocation plus the error that stopped it, if any.
///
/// Outcomes are in input order with no gaps. When `error` is set, the last
/// outcome may be the failing statement; statements after it never appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub outcomes: Vec<StatementOutcome>,
    pub error: Option<WriteError>,
}

impl WriteReport {
    pub(crate) fn completed(outcomes: Vec<StatementOutcome>) -> Self {
        Self {
            outcomes,
            error: None,
        }
    }

    pub(crate) fn aborted(outcomes: Vec<StatementOutcome>, error: WriteError) -> Self {
        Self {
            outcomes,
            error: Some(error),
        }
    }

    /// Returns true when every statement ran and no transaction was left open.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, discarding partial outcomes on error.
    pub fn into_result(self) -> Result<Vec<StatementOutcome>, WriteError> {
        match self.error {
            None => Ok(self.outcomes),
            Some(error) => Err(error),
        }
    }
}
