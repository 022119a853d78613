//! Tests for the write engine state machine.
//!
//! These run against a scripted in-process connection so that begin, commit
//! and rollback failures can be injected. SQLite-backed behavior is covered
//! in `tests/write_query_tests.rs`.

use super::*;
use anyhow::{Result, anyhow};
use std::cell::{Cell, RefCell};

/// Connection that records every call and fails on demand.
#[derive(Default)]
pub(super) struct ScriptedDb {
    pub log: RefCell<Vec<String>>,
    /// Data statements containing any of these fragments fail.
    pub fail_on: Vec<&'static str>,
    pub fail_begin: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    next_id: Cell<i64>,
}

impl ScriptedDb {
    pub fn failing_on(fragments: &[&'static str]) -> Self {
        Self {
            fail_on: fragments.to_vec(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn run(&self, prefix: &str, sql: &str) -> Result<ExecSummary> {
        self.log.borrow_mut().push(format!("{prefix}:{sql}"));
        if self.fail_on.iter().any(|f| sql.contains(f)) {
            return Err(anyhow!("constraint failed: {sql}"));
        }
        let last_insert_id = if sql.to_uppercase().starts_with("INSERT") {
            self.next_id.set(self.next_id.get() + 1);
            Some(self.next_id.get())
        } else {
            None
        };
        Ok(ExecSummary {
            rows_affected: 1,
            last_insert_id,
        })
    }
}

pub(super) struct ScriptedScope<'a> {
    db: &'a ScriptedDb,
}

impl Connection for ScriptedDb {
    type Scope<'a> = ScriptedScope<'a>;

    fn execute(&self, sql: &str) -> Result<ExecSummary> {
        self.run("exec", sql)
    }

    fn begin(&self) -> Result<Self::Scope<'_>> {
        self.log.borrow_mut().push("begin".to_string());
        if self.fail_begin {
            return Err(anyhow!("database is locked"));
        }
        Ok(ScriptedScope { db: self })
    }
}

impl Scope for ScriptedScope<'_> {
    fn execute(&self, sql: &str) -> Result<ExecSummary> {
        self.db.run("tx", sql)
    }

    fn commit(self) -> Result<()> {
        self.db.log.borrow_mut().push("commit".to_string());
        if self.db.fail_commit {
            return Err(anyhow!("disk I/O error"));
        }
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.db.log.borrow_mut().push("rollback".to_string());
        if self.db.fail_rollback {
            return Err(anyhow!("cannot rollback - no transaction is active"));
        }
        Ok(())
    }
}

#[test]
fn test_autocommit_inserts() {
    let db = ScriptedDb::default();
    let report = execute_write(
        &db,
        "INSERT INTO t(v) VALUES ('x'); INSERT INTO t(v) VALUES ('y');",
    );

    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes.iter().all(|o| o.rows_affected == 1));
    assert_eq!(report.outcomes[1].last_insert_id, Some(2));
    assert_eq!(
        db.calls(),
        vec![
            "exec:INSERT INTO t(v) VALUES ('x')",
            "exec:INSERT INTO t(v) VALUES ('y')"
        ]
    );
}

#[test]
fn test_transaction_routes_statements_through_scope() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; UPDATE t SET v = 1; COMMIT; DELETE FROM t");

    assert!(report.is_success());
    let kinds: Vec<_> = report.outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::Begin,
            OperationKind::Update,
            OperationKind::Commit,
            OperationKind::Delete
        ]
    );
    assert_eq!(
        db.calls(),
        vec![
            "begin",
            "tx:UPDATE t SET v = 1",
            "commit",
            "exec:DELETE FROM t"
        ]
    );
}

#[test]
fn test_explicit_rollback() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; DELETE FROM t; ROLLBACK");

    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.outcomes[2].kind, OperationKind::Rollback);
    assert_eq!(db.calls(), vec!["begin", "tx:DELETE FROM t", "rollback"]);
}

#[test]
fn test_empty_query() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, " ; ;\n");

    assert_eq!(report.error, Some(WriteError::EmptyQuery));
    assert!(report.outcomes.is_empty());
    assert!(db.calls().is_empty());
}

#[test]
fn test_invalid_operation_identifies_position() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "INSERT INTO t VALUES (1); SELECT * FROM t; DELETE FROM t");

    assert_eq!(
        report.error,
        Some(WriteError::InvalidOperation {
            position: 2,
            statement: "SELECT * FROM t".to_string()
        })
    );
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(db.calls(), vec!["exec:INSERT INTO t VALUES (1)"]);
}

#[test]
fn test_nested_begin_fails_at_second_statement() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; BEGIN; COMMIT;");

    assert_eq!(
        report.error,
        Some(WriteError::NestedTransaction { position: 2 })
    );
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].kind, OperationKind::Begin);
    assert!(report.outcomes[0].succeeded);
    // The first scope is released, the trailing COMMIT never runs.
    assert_eq!(db.calls(), vec!["begin", "rollback"]);
}

#[test]
fn test_commit_without_begin() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "COMMIT;");

    assert_eq!(report.error, Some(WriteError::UnmatchedCommit { position: 1 }));
    assert!(report.outcomes.is_empty());
    assert!(db.calls().is_empty());
}

#[test]
fn test_rollback_without_begin() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "DELETE FROM t; ROLLBACK");

    assert_eq!(
        report.error,
        Some(WriteError::UnmatchedRollback { position: 2 })
    );
    assert_eq!(report.outcomes.len(), 1);
}

#[test]
fn test_commit_after_commit_is_unmatched() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; COMMIT; COMMIT");

    assert_eq!(report.error, Some(WriteError::UnmatchedCommit { position: 3 }));
    assert_eq!(report.outcomes.len(), 2);
}

#[test]
fn test_failure_in_transaction_rolls_back() {
    let db = ScriptedDb::failing_on(&["bad_table"]);
    let report = execute_write(
        &db,
        "BEGIN; INSERT INTO t VALUES (1); INSERT INTO bad_table VALUES (1); COMMIT",
    );

    match &report.error {
        Some(WriteError::StatementExecutionFailed { position, reason }) => {
            assert_eq!(*position, 3);
            assert!(reason.contains("constraint failed"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].succeeded);
    assert!(report.outcomes[1].succeeded);
    assert!(!report.outcomes[2].succeeded);
    assert!(report.outcomes[2].failure_reason.is_some());
    assert_eq!(
        db.calls(),
        vec![
            "begin",
            "tx:INSERT INTO t VALUES (1)",
            "tx:INSERT INTO bad_table VALUES (1)",
            "rollback"
        ]
    );
}

#[test]
fn test_failed_auto_rollback_is_not_surfaced() {
    let db = ScriptedDb {
        fail_on: vec!["bad"],
        fail_rollback: true,
        ..ScriptedDb::default()
    };
    let report = execute_write(&db, "BEGIN; DELETE FROM bad");

    assert!(matches!(
        report.error,
        Some(WriteError::StatementExecutionFailed { position: 2, .. })
    ));
    assert_eq!(db.calls().iter().filter(|c| *c == "rollback").count(), 1);
}

#[test]
fn test_failure_without_transaction_does_not_roll_back() {
    let db = ScriptedDb::failing_on(&["bad"]);
    let report = execute_write(&db, "INSERT INTO t VALUES (1); UPDATE bad SET x = 1; DELETE FROM t");

    assert!(matches!(
        report.error,
        Some(WriteError::StatementExecutionFailed { position: 2, .. })
    ));
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(
        db.calls(),
        vec!["exec:INSERT INTO t VALUES (1)", "exec:UPDATE bad SET x = 1"]
    );
}

#[test]
fn test_unclosed_transaction() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN;");

    assert_eq!(report.error, Some(WriteError::UnclosedTransaction));
    assert_eq!(report.outcomes.len(), 1);
    assert!(report.outcomes[0].succeeded);
    assert_eq!(db.calls(), vec!["begin", "rollback"]);
}

#[test]
fn test_unclosed_transaction_after_all_statements_succeed() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; INSERT INTO t VALUES (1); UPDATE t SET v = 2");

    assert_eq!(report.error, Some(WriteError::UnclosedTransaction));
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| o.succeeded));
}

#[test]
fn test_begin_failure_is_recorded() {
    let db = ScriptedDb {
        fail_begin: true,
        ..ScriptedDb::default()
    };
    let report = execute_write(&db, "BEGIN; INSERT INTO t VALUES (1); COMMIT");

    assert!(matches!(
        report.error,
        Some(WriteError::BeginFailed { position: 1, .. })
    ));
    assert_eq!(report.outcomes.len(), 1);
    assert!(!report.outcomes[0].succeeded);
    assert_eq!(db.calls(), vec!["begin"]);
}

#[test]
fn test_commit_failure_is_not_reported_as_rollback() {
    let db = ScriptedDb {
        fail_commit: true,
        ..ScriptedDb::default()
    };
    let report = execute_write(&db, "BEGIN; INSERT INTO t VALUES (1); COMMIT; DELETE FROM t");

    match &report.error {
        Some(WriteError::CommitFailed { position, reason }) => {
            assert_eq!(*position, 3);
            assert_eq!(reason, "disk I/O error");
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.outcomes[2].kind, OperationKind::Commit);
    assert!(!report.outcomes[2].succeeded);
    assert!(!db.calls().contains(&"rollback".to_string()));
}

#[test]
fn test_explicit_rollback_failure() {
    let db = ScriptedDb {
        fail_rollback: true,
        ..ScriptedDb::default()
    };
    let report = execute_write(&db, "BEGIN; ROLLBACK");

    assert!(matches!(
        report.error,
        Some(WriteError::RollbackFailed { position: 2, .. })
    ));
    assert_eq!(report.outcomes.len(), 2);
    assert!(!report.outcomes[1].succeeded);
}

#[test]
fn test_insert_id_only_recorded_for_inserts() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "INSERT INTO t VALUES (1); UPDATE t SET v = 2");

    assert_eq!(report.outcomes[0].last_insert_id, Some(1));
    assert_eq!(report.outcomes[1].last_insert_id, None);
}

#[test]
fn test_transaction_control_rows_are_zero() {
    let db = ScriptedDb::default();
    let report = execute_write(&db, "BEGIN; COMMIT");

    assert!(report.outcomes.iter().all(|o| o.rows_affected == 0));
}

#[test]
fn test_execute_statements_accepts_presplit_input() {
    let db = ScriptedDb::default();
    let report = execute_statements(&db, &["DELETE FROM t", "DELETE FROM u"]);
    assert!(report.is_success());

    let empty: [&str; 0] = [];
    let report = execute_statements(&db, &empty);
    assert_eq!(report.error, Some(WriteError::EmptyQuery));
}

#[test]
fn test_into_result() {
    let db = ScriptedDb::default();
    let outcomes = execute_write(&db, "DELETE FROM t").into_result().unwrap();
    assert_eq!(outcomes.len(), 1);

    let err = execute_write(&db, "COMMIT").into_result().unwrap_err();
    assert_eq!(err, WriteError::UnmatchedCommit { position: 1 });
}
