//! Extractor tools for relgate.
//!
//! Each extractor is wrapped as a [`Tool`](relgate_core::Tool) that checks
//! its own arguments, confines any path through the shared
//! [`PathGuard`], and runs the blocking extractor off the async runtime.
//!
//! - `get_test_results` — JUnit report summary
//! - `get_coverage_report` — Cobertura line rate
//! - `check_security_constants` — face threshold and liveness frames
//! - `scan_build_logs` — error/warning lines in raw log text

pub mod build_logs;
pub mod coverage_report;
pub mod security_constants;
pub mod test_results;

use relgate_core::tool::ToolRegistry;
use relgate_core::{ToolError, ToolResult};
use relgate_security::PathGuard;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub use build_logs::{BuildLogsTool, MAX_LOG_CHARS};
pub use coverage_report::CoverageReportTool;
pub use security_constants::SecurityConstantsTool;
pub use test_results::TestResultsTool;

/// Create the registry with all four extractor tools, in discovery order.
pub fn default_registry(guard: Arc<PathGuard>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(TestResultsTool::new(guard.clone())));
    registry.register(Box::new(CoverageReportTool::new(guard.clone())));
    registry.register(Box::new(SecurityConstantsTool::new(guard)));
    registry.register(Box::new(BuildLogsTool));
    registry
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolError> {
    match arguments.get(key) {
        None | Some(serde_json::Value::Null) => Err(ToolError::InvalidArguments(format!(
            "Missing '{key}' argument"
        ))),
        Some(value) => value
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{key}' must be a string"))),
    }
}

/// Confine `path` to the guard's roots.
pub(crate) fn confine(guard: &PathGuard, tool_name: &str, path: &str) -> Result<PathBuf, ToolError> {
    guard.check(path).map_err(|e| {
        tracing::warn!(tool = tool_name, path, "Path rejected by guard");
        ToolError::PermissionDenied {
            tool_name: tool_name.into(),
            reason: e.to_string(),
        }
    })
}

/// Run a blocking extractor on the blocking pool and serialize its record.
pub(crate) async fn run_extractor<T, F>(tool_name: &str, f: F) -> Result<ToolResult, ToolError>
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, relgate_core::ExtractError> + Send + 'static,
{
    let record = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ToolError::ExecutionFailed {
            tool_name: tool_name.into(),
            reason: format!("extractor task failed: {e}"),
        })?
        .map_err(|e| ToolError::from_extract(tool_name, e))?;

    serialize(tool_name, &record)
}

pub(crate) fn serialize<T: Serialize>(tool_name: &str, record: &T) -> Result<ToolResult, ToolError> {
    ToolResult::from_record(record).map_err(|e| ToolError::ExecutionFailed {
        tool_name: tool_name.into(),
        reason: format!("failed to serialize result: {e}"),
    })
}
