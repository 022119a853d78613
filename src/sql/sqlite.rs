//! SQLite-backed SQL storage backend.
//!
//! One `rusqlite::Connection` behind a mutex is the shared handle for every
//! operation. Blocking work runs on tokio's blocking pool.

use super::backend::SqlBackend;
use super::types::{ColumnInfo, Row, Value};
use crate::write::{self, ExecSummary, WriteReport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::Transaction;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const DESCRIBE_TABLE_SQL: &str =
    "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid";

/// SQLite storage backend.
///
/// # Thread Safety
///
/// `SqliteBackend` is `Clone`; clones share the same connection. Each
/// operation holds the connection lock for its whole duration, so a write
/// payload and its transaction are never interleaved with another caller.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteBackend {
    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if needed and verifies the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, not a database, etc.)
    /// - The connection check fails
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(database_path = %path.display(), "opening SQLite database");

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database: {}", path.display()))?;

        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .context("Failed to open in-memory SQLite database")?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection after checking it responds.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection check fails.
    pub fn from_connection(conn: rusqlite::Connection) -> Result<Self> {
        // Reading the catalog forces SQLite to validate the file header.
        debug!("testing database connection");
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("Failed to connect to SQLite database")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn query_sync(&self, sql: &str) -> Result<Vec<Row>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        debug!(?columns, "query columns");

        let rows = stmt
            .query_map([], |row| {
                (0..columns.len())
                    .map(|idx| row.get_ref(idx).map(Value::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .map(|values| -> Result<Row> { Ok(Row::new(columns.clone(), values?)) })
            .collect::<Result<Vec<_>>>()?;

        debug!(rows_returned = rows.len(), "query completed");
        Ok(rows)
    }

    fn write_sync(&self, sql: &str) -> WriteReport {
        let conn = self.conn.lock();
        write::execute_write(&*conn, sql)
    }

    fn execute_batch_sync(&self, sql: &str) -> Result<()> {
        self.conn.lock().execute_batch(sql)?;
        Ok(())
    }

    fn list_tables_sync(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(LIST_TABLES_SQL)
            .context("Failed to read table list")?;

        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read table name")?;

        debug!(count = tables.len(), ?tables, "found tables");
        Ok(tables)
    }

    fn describe_table_sync(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(DESCRIBE_TABLE_SQL)
            .context("Failed to read table information")?;

        let columns = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    default: Value::from(row.get_ref(3)?),
                    primary_key: row.get::<_, i64>(4)? > 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read column information")?;

        if columns.is_empty() {
            anyhow::bail!("no such table: {table}");
        }

        debug!(table, column_count = columns.len(), "table schema retrieved");
        Ok(columns)
    }
}

#[async_trait]
impl SqlBackend for SqliteBackend {
    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let backend = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || backend.query_sync(&sql))
            .await
            .context("Task join error")?
    }

    async fn write(&self, sql: &str) -> Result<WriteReport> {
        let backend = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || backend.write_sync(&sql))
            .await
            .context("Task join error")
    }

    async fn execute_batch(&self, sql: &str) -> Result<()> {
        let backend = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || backend.execute_batch_sync(&sql))
            .await
            .context("Task join error")?
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || backend.list_tables_sync())
            .await
            .context("Task join error")?
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let backend = self.clone();
        let table = table.to_string();
        tokio::task::spawn_blocking(move || backend.describe_table_sync(&table))
            .await
            .context("Task join error")?
    }
}

// Write-engine seam: direct execution on the connection, scopes as
// unchecked transactions so the connection is only borrowed shared.

/// Runs one data statement to completion.
///
/// Rows produced by a `RETURNING` clause are stepped through and discarded;
/// the change has been applied by the time the first row is available.
fn exec(conn: &rusqlite::Connection, sql: &str) -> Result<ExecSummary> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.raw_query();
    while rows.next()?.is_some() {}
    drop(rows);

    let rows_affected = conn.changes();
    Ok(ExecSummary {
        rows_affected,
        last_insert_id: (rows_affected > 0).then(|| conn.last_insert_rowid()),
    })
}

impl write::Connection for rusqlite::Connection {
    type Scope<'a> = Transaction<'a>;

    fn execute(&self, sql: &str) -> Result<ExecSummary> {
        exec(self, sql)
    }

    fn begin(&self) -> Result<Self::Scope<'_>> {
        Ok(self.unchecked_transaction()?)
    }
}

impl write::Scope for Transaction<'_> {
    fn execute(&self, sql: &str) -> Result<ExecSummary> {
        exec(self, sql)
    }

    fn commit(self) -> Result<()> {
        Transaction::commit(self)?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        Transaction::rollback(self)?;
        Ok(())
    }
}
