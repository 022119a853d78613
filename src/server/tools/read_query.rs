//! `read_query` tool: SELECT queries returned as JSON rows.

use tracing::{debug, warn};

use super::{Arguments, ToolDefinition, ToolError, required_str, starts_with_keyword, string_schema};
use crate::sql::SqlService;

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "read_query",
        description: "Execute SELECT queries to read data from the database",
        input_schema: string_schema("query", "The SELECT SQL query to execute"),
    }
}

pub(super) async fn handle(service: &SqlService, args: &Arguments) -> Result<String, ToolError> {
    let query = required_str(args, "query")?;
    debug!(query, "executing read_query");

    if !starts_with_keyword(query, "SELECT") {
        warn!(query, "invalid query type for read_query");
        return Err(ToolError::InvalidRequest(
            "read_query only supports SELECT queries".to_string(),
        ));
    }

    let rows = service.query(query).await?;
    Ok(serde_json::to_string(&rows)?)
}
