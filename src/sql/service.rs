//! High-level `SqlService` wrapper over backend implementations.
//!
//! Provides a convenient API that wraps any `SqlBackend` implementation.

use super::backend::SqlBackend;
use super::sqlite::SqliteBackend;
use super::types::{ColumnInfo, Row};
use crate::write::WriteReport;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// High-level SQL service interface.
///
/// Wraps a `SqlBackend` implementation and provides a consistent API
/// regardless of the underlying storage mechanism.
///
/// # Thread Safety
///
/// `SqlService` is `Clone` and can be shared across tasks. The underlying
/// backend serializes access to its connection.
///
/// # Example
///
/// ```ignore
/// use mcp_sqlite::sql::SqlService;
///
/// let service = SqlService::memory()?;
/// service.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
///
/// let report = service.write("BEGIN; INSERT INTO users (name) VALUES ('Alice'); COMMIT;").await?;
/// assert!(report.is_success());
///
/// let rows = service.query("SELECT * FROM users").await?;
/// ```
#[derive(Clone)]
pub struct SqlService {
    backend: Arc<dyn SqlBackend>,
}

impl SqlService {
    /// Creates a new `SqlService` backed by a file-based SQLite database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = SqliteBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates a new `SqlService` backed by an in-memory SQLite database.
    ///
    /// Ideal for testing. All data is lost when the service is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn memory() -> Result<Self> {
        let backend = SqliteBackend::open_in_memory()?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates a new `SqlService` with a custom backend.
    pub fn custom<B: SqlBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Executes a SELECT query and returns matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if query execution fails.
    pub async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        self.backend.query(sql).await
    }

    /// Runs a multi-statement write payload.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend is unavailable; statement
    /// failures are carried in the report.
    pub async fn write(&self, sql: &str) -> Result<WriteReport> {
        self.backend.write(sql).await
    }

    /// Executes trusted SQL such as schema definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        self.backend.execute_batch(sql).await
    }

    /// Lists user tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.backend.list_tables().await
    }

    /// Describes the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist.
    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.backend.describe_table(table).await
    }
}
