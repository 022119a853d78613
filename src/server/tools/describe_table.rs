//! `describe_table` tool.

use tracing::debug;

use super::{Arguments, ToolDefinition, ToolError, required_str, string_schema};
use crate::sql::SqlService;

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "describe_table",
        description: "View schema information for a specific table",
        input_schema: string_schema("table_name", "Name of table to describe"),
    }
}

pub(super) async fn handle(service: &SqlService, args: &Arguments) -> Result<String, ToolError> {
    let table_name = required_str(args, "table_name")?;
    debug!(table_name, "executing describe_table");

    let columns = service.describe_table(table_name).await?;
    Ok(serde_json::to_string(&columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_describes_columns() {
        let service = SqlService::memory().unwrap();
        service
            .execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL DEFAULT 'none')")
            .await
            .unwrap();

        let args = json!({ "table_name": "users" }).as_object().cloned().unwrap();
        let text = handle(&service, &args).await.unwrap();
        let columns: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(columns[0]["name"], "id");
        assert_eq!(columns[0]["type"], "INTEGER");
        assert_eq!(columns[0]["primary_key"], true);
        assert_eq!(columns[1]["name"], "email");
        assert_eq!(columns[1]["not_null"], true);
        assert_eq!(columns[1]["default"], "'none'");
    }

    #[tokio::test]
    async fn test_requires_table_name() {
        let service = SqlService::memory().unwrap();
        let err = handle(&service, &Arguments::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "table_name parameter is required");
    }
}
