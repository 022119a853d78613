//! Tool handlers organized by operation.
//!
//! Each tool module exposes a `definition()` (name, description, input
//! schema) and a `handle()` that decodes arguments, calls the SQL service
//! and renders the text result.

mod create_table;
mod describe_table;
mod list_tables;
mod read_query;
mod write_query;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::sql::SqlService;

/// Arguments of a tool call.
pub type Arguments = Map<String, Value>;

/// Errors reported back to the caller as a failed tool result.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// A required string argument is missing or empty.
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// The request is well-formed but not allowed for this tool.
    #[error("{0}")]
    InvalidRequest(String),

    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The database rejected the operation.
    #[error("{0}")]
    Failed(String),
}

impl From<anyhow::Error> for ToolError {
    fn from(e: anyhow::Error) -> Self {
        Self::Failed(format!("{e:#}"))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        Self::Failed(format!("failed to convert result to JSON: {e}"))
    }
}

/// Tool description advertised to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Definitions of every registered tool.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        read_query::definition(),
        write_query::definition(),
        create_table::definition(),
        list_tables::definition(),
        describe_table::definition(),
    ]
}

/// Dispatches a tool call by name.
///
/// # Errors
///
/// Returns a [`ToolError`] for unknown tools, invalid arguments, or
/// database failures.
pub async fn call(service: &SqlService, name: &str, args: &Arguments) -> Result<String, ToolError> {
    match name {
        "read_query" => read_query::handle(service, args).await,
        "write_query" => write_query::handle(service, args).await,
        "create_table" => create_table::handle(service, args).await,
        "list_tables" => list_tables::handle(service, args).await,
        "describe_table" => describe_table::handle(service, args).await,
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Extracts a required, non-empty string argument.
fn required_str<'a>(args: &'a Arguments, key: &'static str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ToolError::MissingParameter(key))
}

/// Input schema with a single required string property.
fn string_schema(key: &str, description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            key: { "type": "string", "description": description }
        },
        "required": [key]
    })
}

/// Case-insensitive check that `sql`, after leading whitespace, starts with `keyword`.
fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.trim_start()
        .get(..keyword.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
}
