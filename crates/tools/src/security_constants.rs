//! `check_security_constants` — scrape security constants from source.

use async_trait::async_trait;
use relgate_core::error::ToolError;
use relgate_core::tool::{Tool, ToolResult};
use relgate_extractors::read_security_config;
use relgate_security::PathGuard;
use std::sync::Arc;

const NAME: &str = "check_security_constants";

pub struct SecurityConstantsTool {
    guard: Arc<PathGuard>,
}

impl SecurityConstantsTool {
    pub fn new(guard: Arc<PathGuard>) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Tool for SecurityConstantsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Scan a configuration source file for the face detection threshold and the minimum number of liveness frames. The file is read as text, never executed."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "config_path": {
                    "type": "string",
                    "description": "Path to the configuration source file"
                }
            },
            "required": ["config_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw = crate::required_str(&arguments, "config_path")?;
        let path = crate::confine(&self.guard, NAME, raw)?;
        crate::run_extractor(NAME, move || read_security_config(&path)).await
    }
}
