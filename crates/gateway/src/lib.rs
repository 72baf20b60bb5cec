//! Tool gateway for relgate.
//!
//! Exposes the extractor tools to an external caller. [`Gateway::dispatch`]
//! is the error boundary: whatever a tool does (fails, times out, panics),
//! the caller gets back a text result, never a fault. [`mcp::serve`] puts
//! it behind an `rmcp` server over any async reader and writer, which the
//! CLI binds to stdin and stdout.

pub mod mcp;

use relgate_core::tool::{ToolCall, ToolDefinition, ToolRegistry};
use relgate_core::ToolError;
use relgate_security::{AuditEvent, AuditLogger, AuditOutcome};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use mcp::{MAX_FRAME_BYTES, SERVER_NAME, ServeError, serve, serve_with_limit};

/// Default upper bound on a single tool call.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Text handed back for one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOutcome {
    pub text: String,
    pub is_error: bool,
}

impl CallOutcome {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(err: &ToolError) -> Self {
        Self {
            text: err.to_caller_text(),
            is_error: true,
        }
    }
}

/// Shared gateway state. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    tools: Arc<ToolRegistry>,
    audit: Arc<AuditLogger>,
    timeout: Duration,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("tools", &self.tools.names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Gateway {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            tools,
            audit: Arc::new(AuditLogger::default()),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Arc::new(audit);
        self
    }

    /// Discovery listing, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Run one tool call and render its result as caller-facing text.
    pub async fn dispatch(&self, name: &str, arguments: serde_json::Value) -> CallOutcome {
        debug!(tool = name, "Dispatching tool call");
        let result = self.run(name, arguments).await;
        self.record(name, &result);
        match result {
            Ok(output) => CallOutcome::ok(output),
            Err(e) => CallOutcome::error(&e),
        }
    }

    async fn run(&self, name: &str, arguments: serde_json::Value) -> Result<String, ToolError> {
        if self.tools.get(name).is_none() {
            return Err(ToolError::NotFound(name.into()));
        }

        let tools = self.tools.clone();
        let call = ToolCall {
            name: name.into(),
            arguments,
        };
        let handle = tokio::spawn(async move { tools.execute(&call).await });
        let abort = handle.abort_handle();

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(result)) => result.map(|r| r.output),
            Ok(Err(join_err)) => Err(ToolError::ExecutionFailed {
                tool_name: name.into(),
                reason: format!("tool task aborted: {join_err}"),
            }),
            Err(_) => {
                abort.abort();
                warn!(tool = name, timeout = ?self.timeout, "Tool call timed out");
                Err(ToolError::Timeout {
                    tool_name: name.into(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }

    fn record(&self, name: &str, result: &Result<String, ToolError>) {
        let tool_name = name.to_string();
        match result {
            Ok(_) => self.audit.log(
                AuditEvent::ToolExecution { tool_name },
                name,
                AuditOutcome::Success,
                None,
            ),
            Err(e @ ToolError::PermissionDenied { .. }) => self.audit.log(
                AuditEvent::PathDenied { tool_name },
                name,
                AuditOutcome::Denied,
                Some(e.detail()),
            ),
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => self.audit.log(
                AuditEvent::InputRejected { tool_name },
                name,
                AuditOutcome::Failure,
                Some(e.detail()),
            ),
            Err(e) => self.audit.log(
                AuditEvent::ToolExecution { tool_name },
                name,
                AuditOutcome::Failure,
                Some(e.detail()),
            ),
        }
    }
}
