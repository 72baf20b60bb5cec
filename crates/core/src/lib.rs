//! # relgate core
//!
//! Domain types shared by every relgate crate: the extraction records,
//! the error taxonomy, and the `Tool` / `Provider` seams.
//!
//! The records here are plain values. Each one is produced by a single
//! extraction call, owned by its caller, and never refers to another.

pub mod error;
pub mod message;
pub mod provider;
pub mod record;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ExtractError, ProviderError, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use record::{CoverageSummary, LogAnalysis, SecurityConfig, TestSummary};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
