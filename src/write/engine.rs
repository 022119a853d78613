//! Sequential, fail-fast execution of split write statements.
//!
//! ## States
//!
//! - **NoTransaction**: data statements run directly on the connection
//! - **InTransaction**: data statements run inside the open scope
//!
//! `BEGIN` moves to `InTransaction`, `COMMIT`/`ROLLBACK` move back. Any
//! failure stops the run; a scope still open at that point is rolled back
//! before returning, so no transaction outlives the invocation.

use tracing::{debug, warn};

use super::backend::{Connection, Scope};
use super::classify::{OperationKind, classify};
use super::error::{Result, WriteError};
use super::outcome::{StatementOutcome, WriteReport};
use super::split::split_statements;

/// Splits `raw` into statements and executes them in order.
///
/// Never panics and never leaves a transaction open. See [`WriteReport`]
/// for how partial runs are reported.
///
/// # Example
///
/// ```ignore
/// let conn = rusqlite::Connection::open_in_memory()?;
/// conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")?;
///
/// let report = execute_write(&conn, "BEGIN; INSERT INTO t(v) VALUES ('x'); COMMIT;");
/// assert!(report.is_success());
/// assert_eq!(report.outcomes.len(), 3);
/// ```
pub fn execute_write<C: Connection>(conn: &C, raw: &str) -> WriteReport {
    execute_statements(conn, &split_statements(raw))
}

/// Executes already-split statements in order.
///
/// An empty slice is reported as [`WriteError::EmptyQuery`].
pub fn execute_statements<C, S>(conn: &C, statements: &[S]) -> WriteReport
where
    C: Connection,
    S: AsRef<str>,
{
    if statements.is_empty() {
        return WriteReport::aborted(Vec::new(), WriteError::EmptyQuery);
    }

    debug!(count = statements.len(), "executing write statements");

    let mut engine = Engine {
        conn,
        session: Session::NoTransaction,
        outcomes: Vec::with_capacity(statements.len()),
    };

    for (index, statement) in statements.iter().enumerate() {
        if let Err(error) = engine.step(index + 1, statement.as_ref()) {
            return engine.abort(error);
        }
    }

    engine.finish()
}

/// Transaction state of one invocation.
enum Session<S> {
    NoTransaction,
    InTransaction(S),
}

impl<S: Scope> Session<S> {
    fn is_open(&self) -> bool {
        matches!(self, Self::InTransaction(_))
    }

    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::NoTransaction)
    }

    /// Rolls back a scope left open by an aborted or unterminated run.
    fn release(self) {
        if let Self::InTransaction(scope) = self {
            debug!("rolling back open transaction");
            if let Err(e) = scope.rollback() {
                warn!(error = %e, "failed to roll back open transaction");
            }
        }
    }
}

struct Engine<'c, C>
where
    C: Connection + 'c,
{
    conn: &'c C,
    session: Session<C::Scope<'c>>,
    outcomes: Vec<StatementOutcome>,
}

impl<'c, C: Connection> Engine<'c, C> {
    fn step(&mut self, position: usize, statement: &str) -> Result<()> {
        let kind = classify(statement).ok_or_else(|| WriteError::InvalidOperation {
            position,
            statement: statement.to_string(),
        })?;

        debug!(position, %kind, in_transaction = self.session.is_open(), "executing statement");

        match kind {
            OperationKind::Begin => self.begin(position, statement),
            OperationKind::Commit => self.commit(position, statement),
            OperationKind::Rollback => self.rollback(position, statement),
            OperationKind::Insert | OperationKind::Update | OperationKind::Delete => {
                self.change(position, statement, kind)
            },
        }
    }

    fn begin(&mut self, position: usize, statement: &str) -> Result<()> {
        if self.session.is_open() {
            return Err(WriteError::NestedTransaction { position });
        }

        let conn = self.conn;
        match conn.begin() {
            Ok(scope) => {
                self.session = Session::InTransaction(scope);
                self.record_success(statement, OperationKind::Begin);
                Ok(())
            },
            Err(e) => {
                let reason = self.record_failure(statement, OperationKind::Begin, &e);
                Err(WriteError::BeginFailed { position, reason })
            },
        }
    }

    fn commit(&mut self, position: usize, statement: &str) -> Result<()> {
        let Session::InTransaction(scope) = self.session.take() else {
            return Err(WriteError::UnmatchedCommit { position });
        };

        match scope.commit() {
            Ok(()) => {
                self.record_success(statement, OperationKind::Commit);
                Ok(())
            },
            Err(e) => {
                let reason = self.record_failure(statement, OperationKind::Commit, &e);
                Err(WriteError::CommitFailed { position, reason })
            },
        }
    }

    fn rollback(&mut self, position: usize, statement: &str) -> Result<()> {
        let Session::InTransaction(scope) = self.session.take() else {
            return Err(WriteError::UnmatchedRollback { position });
        };

        match scope.rollback() {
            Ok(()) => {
                self.record_success(statement, OperationKind::Rollback);
                Ok(())
            },
            Err(e) => {
                let reason = self.record_failure(statement, OperationKind::Rollback, &e);
                Err(WriteError::RollbackFailed { position, reason })
            },
        }
    }

    fn change(&mut self, position: usize, statement: &str, kind: OperationKind) -> Result<()> {
        let result = match &self.session {
            Session::InTransaction(scope) => scope.execute(statement),
            Session::NoTransaction => self.conn.execute(statement),
        };

        match result {
            Ok(summary) => {
                debug!(position, rows_affected = summary.rows_affected, "statement executed");
                self.outcomes
                    .push(StatementOutcome::changed(statement, kind, summary));
                Ok(())
            },
            Err(e) => {
                let reason = self.record_failure(statement, kind, &e);
                // Best-effort cleanup; the statement error is what gets reported.
                self.session.take().release();
                Err(WriteError::StatementExecutionFailed { position, reason })
            },
        }
    }

    fn record_success(&mut self, statement: &str, kind: OperationKind) {
        self.outcomes
            .push(StatementOutcome::succeeded(statement, kind));
    }

    fn record_failure(
        &mut self,
        statement: &str,
        kind: OperationKind,
        error: &anyhow::Error,
    ) -> String {
        let reason = format!("{error:#}");
        self.outcomes
            .push(StatementOutcome::failed(statement, kind, reason.clone()));
        reason
    }

    fn abort(self, error: WriteError) -> WriteReport {
        debug!(
            error = %error,
            attempted = self.outcomes.len(),
            "write execution aborted"
        );
        self.session.release();
        WriteReport::aborted(self.outcomes, error)
    }

    fn finish(self) -> WriteReport {
        if self.session.is_open() {
            return self.abort(WriteError::UnclosedTransaction);
        }
        WriteReport::completed(self.outcomes)
    }
}
