//! MCP server over newline-delimited stdio, built on `rmcp`.
//!
//! `rmcp` owns the handshake, `ping`, notifications and response framing;
//! `tools/list` and `tools/call` delegate to [`Gateway`]. Inbound lines go
//! through a frame pump first: a line longer than the frame limit, or one
//! that is not a JSON object, is dropped with a warning and the session
//! keeps serving. `rmcp` itself closes the transport on an undecodable
//! frame, so nothing of that kind is allowed through.

use crate::{CallOutcome, Gateway};
use relgate_core::tool::ToolDefinition;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Name reported in the `initialize` handshake.
pub const SERVER_NAME: &str = "ai-release-manager-tools";

/// Largest accepted request line. A maximal `scan_build_logs` payload
/// (1,000,000 characters, JSON-escaped) fits with room to spare.
pub const MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

const PIPE_CAPACITY: usize = 64 * 1024;

const INSTRUCTIONS: &str = "Release-gate tools: JUnit test results, Cobertura coverage, \
security constants from a config source, and build-log analysis. File paths must lie \
inside the working directory, its artifacts directory, or the home directory.";

/// Failure of the session as a whole. Tool failures never end up here.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("MCP handshake failed: {0}")]
    Initialize(String),

    #[error("MCP session task failed: {0}")]
    Session(#[from] tokio::task::JoinError),
}

impl ServerHandler for Gateway {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.definitions().into_iter().map(to_mcp_tool).collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());
        Ok(self.dispatch(&request.name, arguments).await.into())
    }
}

impl From<CallOutcome> for CallToolResult {
    fn from(outcome: CallOutcome) -> Self {
        let content = vec![Content::text(outcome.text)];
        if outcome.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

fn to_mcp_tool(definition: ToolDefinition) -> Tool {
    let schema = match definition.input_schema {
        Value::Object(map) => map,
        _ => JsonObject::default(),
    };
    Tool::new(definition.name, definition.description, Arc::new(schema))
}

/// Serve MCP requests from `reader`, writing responses to `writer`, until
/// the reader reaches end of input.
pub async fn serve<R, W>(gateway: Gateway, reader: R, writer: W) -> Result<(), ServeError>
where
    R: AsyncBufRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    serve_with_limit(gateway, reader, writer, MAX_FRAME_BYTES).await
}

/// [`serve`] with an explicit per-line byte limit.
pub async fn serve_with_limit<R, W>(
    gateway: Gateway,
    reader: R,
    writer: W,
    max_frame: usize,
) -> Result<(), ServeError>
where
    R: AsyncBufRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    info!(server = SERVER_NAME, max_frame, "Tool gateway listening");

    let (inbound, pump_end) = tokio::io::duplex(PIPE_CAPACITY);
    let pump = tokio::spawn(async move {
        if let Err(e) = pump_frames(reader, pump_end, max_frame).await {
            warn!(error = %e, "Request stream failed");
        }
    });

    let session = match gateway.serve((inbound, writer)).await {
        Ok(session) => session,
        Err(e) => {
            pump.abort();
            return Err(ServeError::Initialize(e.to_string()));
        }
    };

    let reason = session.waiting().await;
    pump.abort();
    let reason = reason?;
    info!(?reason, "Tool gateway stopping");
    Ok(())
}

/// Copy acceptable request lines from `reader` to `sink`, one per line.
async fn pump_frames<R, W>(mut reader: R, mut sink: W, max_frame: usize) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = (&mut reader)
            .take(max_frame as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if read == 0 {
            break;
        }

        if buf.len() > max_frame && buf.last() != Some(&b'\n') {
            warn!(limit = max_frame, "Dropping oversized request line");
            discard_line(&mut reader).await?;
            continue;
        }

        let frame = buf.trim_ascii();
        if frame.is_empty() {
            continue;
        }
        if !matches!(serde_json::from_slice::<Value>(frame), Ok(Value::Object(_))) {
            warn!(bytes = frame.len(), "Dropping request line that is not a JSON object");
            continue;
        }

        sink.write_all(frame).await?;
        sink.write_all(b"\n").await?;
    }
    sink.shutdown().await
}

/// Skip input up to and including the next newline (or end of input).
async fn discard_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (found, used) = {
            let chunk = reader.fill_buf().await?;
            if chunk.is_empty() {
                return Ok(());
            }
            match chunk.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, chunk.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}
