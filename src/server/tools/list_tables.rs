//! `list_tables` tool.

use serde_json::json;
use tracing::debug;

use super::{Arguments, ToolDefinition, ToolError};
use crate::sql::SqlService;

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_tables",
        description: "Get a list of all tables in the database",
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

pub(super) async fn handle(service: &SqlService, _args: &Arguments) -> Result<String, ToolError> {
    debug!("executing list_tables");
    let tables = service.list_tables().await?;
    Ok(serde_json::to_string(&tables)?)
}
