//! `create_table` tool.

use tracing::{debug, error, info, warn};

use super::{Arguments, ToolDefinition, ToolError, required_str, starts_with_keyword, string_schema};
use crate::sql::SqlService;

const CREATE_TABLE: &str = "CREATE TABLE";
const IF_NOT_EXISTS: &str = "IF NOT EXISTS";

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_table",
        description: "Create new tables in the database",
        input_schema: string_schema("query", "CREATE TABLE SQL statement"),
    }
}

pub(super) async fn handle(service: &SqlService, args: &Arguments) -> Result<String, ToolError> {
    let query = required_str(args, "query")?;
    debug!(query, "executing create_table");

    if !starts_with_keyword(query, CREATE_TABLE) {
        warn!(query, "invalid query type for create_table");
        return Err(ToolError::InvalidRequest(
            "create_table only supports CREATE TABLE statements".to_string(),
        ));
    }

    service.execute_batch(query).await?;

    let Some(table_name) = table_name(query) else {
        error!(query, "could not extract table name");
        return Err(ToolError::Failed("could not extract table name".to_string()));
    };
    info!(table_name, "table created successfully");

    Ok(format!("Table '{table_name}' was successfully created"))
}

/// Extracts the table name from a `CREATE TABLE` statement.
fn table_name(query: &str) -> Option<String> {
    let mut rest = query.trim_start().get(CREATE_TABLE.len()..)?.trim_start();
    if starts_with_keyword(rest, IF_NOT_EXISTS) {
        rest = rest[IF_NOT_EXISTS.len()..].trim_start();
    }

    let token = rest
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()?
        .trim_matches(|c| matches!(c, '`' | '[' | ']' | '"' | '\''));

    (!token.is_empty()).then(|| token.to_string())
}
