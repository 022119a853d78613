//! Multi-statement write executor.
//!
//! Takes one text payload holding one or more `INSERT`/`UPDATE`/`DELETE`
//! statements, optionally wrapped in `BEGIN` ... `COMMIT`/`ROLLBACK`, and
//! runs it against a shared connection:
//!
//! - [`split_statements`] - payload to trimmed, non-empty statements
//! - [`classify`] - leading keyword to [`OperationKind`]
//! - [`execute_write`] - sequential, fail-fast execution with transaction tracking
//! - [`format_result`] - outcomes to the summary text returned to callers
//!
//! # Example
//!
//! ```ignore
//! use mcp_sqlite::write::{execute_write, format_result};
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")?;
//!
//! let report = execute_write(&conn, "INSERT INTO t(v) VALUES ('x'); INSERT INTO t(v) VALUES ('y');");
//! assert_eq!(
//!     format_result(&report.outcomes),
//!     "Successfully executed 2 statements. Total rows affected: 2, last insert ID: 2"
//! );
//! ```

mod backend;
mod classify;
mod engine;
mod error;
mod format;
mod outcome;
mod split;

#[cfg(test)]
mod tests;

// Re-export the public API
pub use backend::{Connection, Scope};
pub use classify::{OperationKind, classify};
pub use engine::{execute_statements, execute_write};
pub use error::WriteError;
pub use format::{StatementFailure, WriteSummary, format_result, summarize};
pub use outcome::{ExecSummary, StatementOutcome, WriteReport};
pub use split::split_statements;
