//! Tool server speaking line-delimited JSON-RPC over stdio.
//!
//! Each input line is one request; each response is written as one line.
//! Methods:
//!
//! - `initialize` - protocol version, capabilities and server info
//! - `ping` - liveness check
//! - `tools/list` - registered tool definitions
//! - `tools/call` - run a tool; failures come back as `isError` results
//!
//! Notifications (requests without an `id`) are accepted and never answered.

pub mod protocol;
pub mod tools;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::constants;
use crate::sql::SqlService;
use protocol::{
    CallToolParams, CallToolResult, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, Request, Response, RpcError,
};

/// Formats the advertised version, appending the build revision if known.
pub fn version_string(version: &str, revision: Option<&str>) -> String {
    match revision.map(str::trim) {
        Some(rev) if !rev.is_empty() => format!("{version} ({rev})"),
        _ => version.to_string(),
    }
}

/// Opens the configured database and serves tools on stdio until EOF.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or stdio fails.
pub async fn run(config: &Config, version: &str) -> Result<()> {
    info!("starting MCP SQLite server");

    debug!(database_path = %config.sqlite.path.display(), "creating SQLite server");
    let service = SqlService::file(&config.sqlite.path).context("failed to create SQLite server")?;

    let server = ToolServer::new(service, constants::SERVER_NAME, version);
    debug!(name = constants::SERVER_NAME, version, "serving tools on stdio");

    server.serve_stdio().await.context("failed to serve stdio")?;

    info!("server shutting down");
    Ok(())
}

/// Request dispatcher bound to one SQL service.
#[derive(Clone)]
pub struct ToolServer {
    service: SqlService,
    name: String,
    version: String,
}

impl ToolServer {
    pub fn new(service: SqlService, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Serves requests from stdin, writing responses to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serves line-delimited requests from `reader` until EOF.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure. Malformed requests are answered
    /// with JSON-RPC errors and do not stop the loop.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut out =
                    serde_json::to_vec(&response).context("Failed to serialize response")?;
                out.push(b'\n');
                writer
                    .write_all(&out)
                    .await
                    .context("Failed to write response")?;
                writer.flush().await.context("Failed to flush response")?;
            }
        }

        debug!("input closed");
        Ok(())
    }

    /// Handles one raw request line.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "failed to parse request");
                Some(Response::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                ))
            },
        }
    }

    /// Handles one decoded request; returns `None` for notifications.
    ///
    /// Notifications are never answered, even malformed ones.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        if request.is_notification() {
            if request.jsonrpc != JSONRPC_VERSION {
                warn!(
                    method = %request.method,
                    jsonrpc = %request.jsonrpc,
                    "ignoring notification with unsupported jsonrpc version"
                );
            } else {
                debug!(method = %request.method, "notification received");
            }
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(Response::failure(
                id,
                RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }

        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                error!(method = %request.method, code = e.code, message = %e.message, "request failed");
                Response::failure(id, e)
            },
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        debug!(method, "dispatching request");
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": self.name, "version": self.version },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::definitions() })),
            "tools/call" => {
                let params: CallToolParams =
                    serde_json::from_value(params.unwrap_or(Value::Null))
                        .map_err(|e| RpcError::new(INVALID_PARAMS, format!("invalid params: {e}")))?;
                let result = self.call_tool(&params).await;
                serde_json::to_value(result)
                    .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))
            },
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            )),
        }
    }

    async fn call_tool(&self, params: &CallToolParams) -> CallToolResult {
        match tools::call(&self.service, &params.name, &params.arguments).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                error!(tool = %params.name, error = %e, "tool call failed");
                CallToolResult::error(e.to_string())
            },
        }
    }
}
