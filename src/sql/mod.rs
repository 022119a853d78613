//! Embedded SQL service with pluggable backends.
//!
//! Provides the database operations exposed as tools: reads, multi-statement
//! writes (see [`crate::write`]), schema changes and catalog inspection.
//!
//! # Example
//!
//! ```ignore
//! use mcp_sqlite::sql::SqlService;
//!
//! // In-memory (testing)
//! let service = SqlService::memory()?;
//!
//! // Persistent
//! let service = SqlService::file("./sqlite.db")?;
//!
//! service.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
//! service.write("INSERT INTO users (name) VALUES ('Alice')").await?;
//! let tables = service.list_tables().await?;
//! ```
//!
//! # Custom Backends
//!
//! Implement the `SqlBackend` trait to use custom storage:
//!
//! ```ignore
//! use mcp_sqlite::sql::{SqlBackend, SqlService};
//!
//! struct RecordingBackend { /* ... */ }
//! impl SqlBackend for RecordingBackend { /* ... */ }
//!
//! let service = SqlService::custom(RecordingBackend::new());
//! ```

mod backend;
mod service;
mod sqlite;
mod types;


// Re-export the public API
pub use backend::SqlBackend;
pub use service::SqlService;
pub use sqlite::SqliteBackend;
pub use types::{ColumnInfo, Row, Value};
