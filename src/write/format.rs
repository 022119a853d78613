//! Human-readable and structured summaries of write outcomes.

use serde::Serialize;
use std::fmt;

use super::classify::OperationKind;
use super::outcome::StatementOutcome;

/// Aggregate of a sequence of statement outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Statements attempted.
    pub total: usize,
    pub succeeded: usize,
    /// Sum of rows affected by successful data statements.
    pub rows_affected: u64,
    /// Most recent non-zero insert id from a successful `INSERT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i64>,
    pub failures: Vec<StatementFailure>,
}

/// A failed statement and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementFailure {
    /// 1-based position in the attempted sequence.
    pub position: usize,
    pub reason: String,
}

impl WriteSummary {
    /// Returns true if every attempted statement succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Aggregates outcomes into a [`WriteSummary`].
pub fn summarize(outcomes: &[StatementOutcome]) -> WriteSummary {
    let mut summary = WriteSummary {
        total: outcomes.len(),
        succeeded: 0,
        rows_affected: 0,
        last_insert_id: None,
        failures: Vec::new(),
    };

    for (index, outcome) in outcomes.iter().enumerate() {
        if !outcome.succeeded {
            summary.failures.push(StatementFailure {
                position: index + 1,
                reason: outcome.failure_reason.clone().unwrap_or_default(),
            });
            continue;
        }

        summary.succeeded += 1;
        if outcome.kind.is_data_change() {
            summary.rows_affected += outcome.rows_affected;
        }
        if outcome.kind == OperationKind::Insert
            && let Some(id) = outcome.last_insert_id
            && id > 0
        {
            summary.last_insert_id = Some(id);
        }
    }

    summary
}

/// Formats outcomes as the text returned to the caller.
///
/// ```
/// use mcp_sqlite::write::format_result;
///
/// assert_eq!(
///     format_result(&[]),
///     "Successfully executed 0 statements. Total rows affected: 0"
/// );
/// ```
pub fn format_result(outcomes: &[StatementOutcome]) -> String {
    summarize(outcomes).to_string()
}

impl fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_succeeded() {
            write!(
                f,
                "Successfully executed {} statements. Total rows affected: {}",
                self.total, self.rows_affected
            )?;
        } else {
            write!(
                f,
                "Executed {} out of {} statements. Total rows affected: {}",
                self.succeeded, self.total, self.rows_affected
            )?;
        }

        if let Some(id) = self.last_insert_id {
            write!(f, ", last insert ID: {id}")?;
        }

        for failure in &self.failures {
            write!(
                f,
                "\nError in statement {}: {}",
                failure.position, failure.reason
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::outcome::ExecSummary;

    fn insert(id: i64) -> StatementOutcome {
        StatementOutcome::changed(
            "INSERT INTO t(v) VALUES ('x')",
            OperationKind::Insert,
            ExecSummary {
                rows_affected: 1,
                last_insert_id: Some(id),
            },
        )
    }

    #[test]
    fn test_format_full_success_with_insert_id() {
        let outcomes = vec![insert(1), insert(2)];
        assert_eq!(
            format_result(&outcomes),
            "Successfully executed 2 statements. Total rows affected: 2, last insert ID: 2"
        );
    }

    #[test]
    fn test_format_success_without_insert_id() {
        let outcomes = vec![
            StatementOutcome::succeeded("BEGIN", OperationKind::Begin),
            StatementOutcome::changed(
                "UPDATE t SET v = 'y'",
                OperationKind::Update,
                ExecSummary {
                    rows_affected: 3,
                    last_insert_id: None,
                },
            ),
            StatementOutcome::succeeded("COMMIT", OperationKind::Commit),
        ];
        assert_eq!(
            format_result(&outcomes),
            "Successfully executed 3 statements. Total rows affected: 3"
        );
    }

    #[test]
    fn test_format_partial_lists_failures() {
        let outcomes = vec![
            StatementOutcome::succeeded("BEGIN", OperationKind::Begin),
            insert(7),
            StatementOutcome::failed(
                "INSERT INTO bad VALUES (1)",
                OperationKind::Insert,
                "no such table: bad",
            ),
        ];
        assert_eq!(
            format_result(&outcomes),
            "Executed 2 out of 3 statements. Total rows affected: 1, last insert ID: 7\n\
             Error in statement 3: no such table: bad"
        );
    }

    #[test]
    fn test_summary_ignores_failed_rows_and_zero_ids() {
        let mut failed = insert(9);
        failed.succeeded = false;
        failed.failure_reason = Some("boom".to_string());

        let summary = summarize(&[insert(0), failed]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.rows_affected, 1);
        assert_eq!(summary.last_insert_id, None);
        assert_eq!(
            summary.failures,
            vec![StatementFailure {
                position: 2,
                reason: "boom".to_string()
            }]
        );
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_value(summarize(&[insert(4)])).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["rows_affected"], 1);
        assert_eq!(json["last_insert_id"], 4);
        assert!(json["failures"].as_array().unwrap().is_empty());
    }
}
