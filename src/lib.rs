//! SQLite tool server.
//!
//! Exposes a SQLite database to tool-calling clients over line-delimited
//! JSON-RPC on stdio. The core is [`write`], which runs multi-statement
//! write requests with explicit `BEGIN`/`COMMIT`/`ROLLBACK` control.

pub mod config;
pub mod constants;
pub mod logging;
pub mod server;
pub mod sql;
pub mod write;
