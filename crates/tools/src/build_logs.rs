//! `scan_build_logs` — classify error and warning lines in log text.
//!
//! Takes the log content itself rather than a path, so no path guard is
//! involved. Input is capped at [`MAX_LOG_CHARS`] characters.

use async_trait::async_trait;
use relgate_core::error::ToolError;
use relgate_core::tool::{Tool, ToolResult};
use relgate_extractors::{DEFAULT_MAX_LINES, analyze_logs};

const NAME: &str = "scan_build_logs";

/// Longest log text accepted, in characters.
pub const MAX_LOG_CHARS: usize = 1_000_000;

pub struct BuildLogsTool;

fn max_lines_arg(arguments: &serde_json::Value) -> Result<usize, ToolError> {
    match arguments.get("max_lines") {
        None | Some(serde_json::Value::Null) => Ok(DEFAULT_MAX_LINES),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ToolError::InvalidArguments("'max_lines' must be a non-negative integer".into())
            }),
    }
}

#[async_trait]
impl Tool for BuildLogsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Scan raw build log text and return error and warning counts plus the first matching lines of each."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "log_text": {
                    "type": "string",
                    "description": "Raw build log content"
                },
                "max_lines": {
                    "type": "integer",
                    "description": "Maximum number of lines kept per category",
                    "default": DEFAULT_MAX_LINES
                }
            },
            "required": ["log_text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let text = crate::required_str(&arguments, "log_text")?;
        let max_lines = max_lines_arg(&arguments)?;

        if text.chars().nth(MAX_LOG_CHARS).is_some() {
            return Err(ToolError::InvalidArguments(format!(
                "log_text exceeds {MAX_LOG_CHARS} characters"
            )));
        }

        let analysis = analyze_logs(text, max_lines);
        crate::serialize(NAME, &analysis)
    }
}
