//! `write_query` tool: multi-statement writes with optional transactions.

use tracing::{debug, error, info, warn};

use super::{Arguments, ToolDefinition, ToolError, required_str, string_schema};
use crate::sql::SqlService;
use crate::write::{WriteError, format_result};

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "write_query",
        description: "Execute write queries (INSERT, UPDATE, DELETE) to modify data in the database. \
                      Supports multiple statements separated by semicolons and transactions (BEGIN, COMMIT, ROLLBACK)",
        input_schema: string_schema(
            "query",
            "The SQL write query (INSERT, UPDATE, DELETE) to execute. Supports multiple statements \
             separated by semicolons and transactions (BEGIN, COMMIT, ROLLBACK)",
        ),
    }
}

/// Runs the payload and renders the summary.
///
/// On failure the error text comes first; when any statement was attempted,
/// the partial summary follows it.
pub(super) async fn handle(service: &SqlService, args: &Arguments) -> Result<String, ToolError> {
    let query = required_str(args, "query")?;
    debug!(query, "executing write_query");

    let report = service.write(query).await?;
    let summary = format_result(&report.outcomes);

    match report.error {
        None => {
            info!(total = report.outcomes.len(), "statements executed");
            Ok(summary)
        },
        Some(WriteError::EmptyQuery) => {
            warn!(query, "empty query");
            Err(ToolError::InvalidRequest(WriteError::EmptyQuery.to_string()))
        },
        Some(e) => {
            error!(error = %e, attempted = report.outcomes.len(), "failed to execute statements");
            if !report.outcomes.is_empty() {
                Err(ToolError::Failed(format!("{e}\n{summary}")))
            } else {
                Err(ToolError::Failed(e.to_string()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn service() -> SqlService {
        let service = SqlService::memory().unwrap();
        service
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT UNIQUE)")
            .await
            .unwrap();
        service
    }

    fn query(sql: &str) -> Arguments {
        json!({ "query": sql }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_success_summary() {
        let service = service().await;
        let text = handle(
            &service,
            &query("INSERT INTO t(v) VALUES ('x'); INSERT INTO t(v) VALUES ('y');"),
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "Successfully executed 2 statements. Total rows affected: 2, last insert ID: 2"
        );
    }

    #[tokio::test]
    async fn test_missing_query() {
        let service = service().await;
        let err = handle(&service, &Arguments::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "query parameter is required");
    }

    #[tokio::test]
    async fn test_empty_query() {
        let service = service().await;
        let err = handle(&service, &query(" ; ; ")).await.unwrap_err();
        assert_eq!(err.to_string(), "empty query");
    }

    #[tokio::test]
    async fn test_error_before_any_statement_is_plain_message() {
        let service = service().await;
        let err = handle(&service, &query("COMMIT; INSERT INTO t(v) VALUES ('a')"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "COMMIT without BEGIN");
    }

    #[tokio::test]
    async fn test_validation_error_after_statements_includes_summary() {
        let service = service().await;
        let err = handle(
            &service,
            &query("INSERT INTO t(v) VALUES ('a'); SELECT * FROM t; INSERT INTO t(v) VALUES ('b')"),
        )
        .await
        .unwrap_err()
        .to_string();

        assert_eq!(
            err,
            "statement 2 is not a valid write operation: SELECT * FROM t\n\
             Successfully executed 1 statements. Total rows affected: 1, last insert ID: 1"
        );
    }

    #[tokio::test]
    async fn test_unclosed_transaction_includes_summary() {
        let service = service().await;
        let err = handle(&service, &query("BEGIN; INSERT INTO t(v) VALUES ('a');"))
            .await
            .unwrap_err()
            .to_string();

        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines[0], "transaction was not committed or rolled back");
        assert_eq!(
            lines[1],
            "Successfully executed 2 statements. Total rows affected: 1, last insert ID: 1"
        );
        assert_eq!(lines.len(), 2);

        let rows = service.query("SELECT COUNT(*) AS n FROM t").await.unwrap();
        assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[{"n":0}]"#);
    }

    #[tokio::test]
    async fn test_execution_failure_includes_partial_summary() {
        let service = service().await;
        let err = handle(
            &service,
            &query("BEGIN; INSERT INTO t(v) VALUES ('a'); INSERT INTO t(v) VALUES ('a'); COMMIT"),
        )
        .await
        .unwrap_err()
        .to_string();

        let lines: Vec<&str> = err.lines().collect();
        assert!(lines[0].starts_with("failed to execute statement 3: UNIQUE constraint failed"));
        assert_eq!(
            lines[1],
            "Executed 2 out of 3 statements. Total rows affected: 1, last insert ID: 1"
        );
        assert!(lines[2].starts_with("Error in statement 3: UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn test_invalid_operation() {
        let service = service().await;
        let err = handle(&service, &query("SELECT * FROM t")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "statement 1 is not a valid write operation: SELECT * FROM t"
        );
    }
}
