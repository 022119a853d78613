//! Database seam for the write engine.
//!
//! The engine only needs two capabilities from the shared handle: run a
//! statement directly, and open a transaction scope that can run statements
//! and then be committed or rolled back. SQLite implements both in
//! `crate::sql::sqlite`; tests use scripted fakes.

use anyhow::Result;

use super::outcome::ExecSummary;

/// A shared database handle the engine executes against.
pub trait Connection {
    /// Transaction scope borrowed from this connection.
    type Scope<'a>: Scope
    where
        Self: 'a;

    /// Executes one statement outside any transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the statement.
    fn execute(&self, sql: &str) -> Result<ExecSummary>;

    /// Opens a new transaction scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot start a transaction.
    fn begin(&self) -> Result<Self::Scope<'_>>;
}

/// An open transaction. Consumed by `commit` or `rollback`.
pub trait Scope {
    /// Executes one statement inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the statement.
    fn execute(&self, sql: &str) -> Result<ExecSummary>;

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(self) -> Result<()>;

    /// Rolls the transaction back.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    fn rollback(self) -> Result<()>;
}
