//! Backend trait for the SQL service.
//!
//! Defines the interface that all SQL storage backends must implement,
//! enabling pluggable storage behind the tool layer.

use super::types::{ColumnInfo, Row};
use crate::write::WriteReport;
use anyhow::Result;
use async_trait::async_trait;

/// Backend trait for SQL storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// A backend owns one shared handle; concurrent callers are serialized by
/// the backend itself.
///
/// # Example
///
/// ```ignore
/// use mcp_sqlite::sql::{SqlBackend, SqliteBackend};
///
/// let backend = SqliteBackend::open_in_memory()?;
/// backend.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
/// let report = backend.write("INSERT INTO users (name) VALUES ('Alice')").await?;
/// let rows = backend.query("SELECT * FROM users").await?;
/// ```
#[async_trait]
pub trait SqlBackend: Send + Sync + 'static {
    /// Executes a SELECT query and returns matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Query preparation fails (SQL syntax error)
    /// - Query execution or result fetching fails
    async fn query(&self, sql: &str) -> Result<Vec<Row>>;

    /// Runs a multi-statement write payload through the write executor.
    ///
    /// Statement-level failures are reported inside the [`WriteReport`],
    /// not as `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself is unavailable.
    async fn write(&self, sql: &str) -> Result<WriteReport>;

    /// Executes trusted SQL (schema definitions) as a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the batch fails to execute.
    async fn execute_batch(&self, sql: &str) -> Result<()>;

    /// Lists user tables, excluding SQLite's internal ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Describes the columns of a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the catalog cannot be read.
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>>;
}
