//! Error types for the relgate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the tool gateway is the
//! single place where they are flattened into caller-facing text.

use thiserror::Error;

// --- Bounded context errors ---

/// Failure of a single extractor call.
///
/// "Value absent" states (missing security config file, empty log) are
/// not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("Artifact not found: {path}")]
    NotFound { path: String },

    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to interpret {path}: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Permission denied: {tool_name} — {reason}")]
    PermissionDenied { tool_name: String, reason: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}

impl ToolError {
    /// Map an extractor failure onto the gateway taxonomy.
    pub fn from_extract(tool_name: &str, err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound { .. } => ToolError::FileNotFound(err.to_string()),
            ExtractError::Malformed { .. } | ExtractError::Io { .. } | ExtractError::Parse { .. } => {
                ToolError::ExecutionFailed {
                    tool_name: tool_name.into(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Caller-facing category label.
    pub fn category(&self) -> &'static str {
        match self {
            ToolError::FileNotFound(_) => "File not found",
            ToolError::PermissionDenied { .. } => "Permission denied",
            ToolError::NotFound(_) | ToolError::InvalidArguments(_) => "Invalid input",
            ToolError::ExecutionFailed { .. } | ToolError::Timeout { .. } => "Execution failed",
        }
    }

    /// The message part of the caller-facing text, without the category.
    pub fn detail(&self) -> String {
        match self {
            ToolError::NotFound(name) => format!("Unknown tool: {name}"),
            ToolError::InvalidArguments(msg) => msg.clone(),
            ToolError::PermissionDenied { reason, .. } => reason.clone(),
            ToolError::FileNotFound(msg) => msg.clone(),
            ToolError::ExecutionFailed { reason, .. } => reason.clone(),
            ToolError::Timeout {
                tool_name,
                timeout_secs,
            } => format!("{tool_name} did not finish within {timeout_secs}s"),
        }
    }

    /// Render as `Error: <category> - <message>`.
    pub fn to_caller_text(&self) -> String {
        format!("Error: {} - {}", self.category(), self.detail())
    }
}
