//! `get_coverage_report` — read the line rate from a Cobertura report.

use async_trait::async_trait;
use relgate_core::error::ToolError;
use relgate_core::tool::{Tool, ToolResult};
use relgate_extractors::parse_cobertura_xml;
use relgate_security::PathGuard;
use std::sync::Arc;

const NAME: &str = "get_coverage_report";

pub struct CoverageReportTool {
    guard: Arc<PathGuard>,
}

impl CoverageReportTool {
    pub fn new(guard: Arc<PathGuard>) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Tool for CoverageReportTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Parse a Cobertura XML coverage report and return the overall line rate."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "xml_path": {
                    "type": "string",
                    "description": "Path to the Cobertura XML report"
                }
            },
            "required": ["xml_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw = crate::required_str(&arguments, "xml_path")?;
        let path = crate::confine(&self.guard, NAME, raw)?;
        crate::run_extractor(NAME, move || parse_cobertura_xml(&path)).await
    }
}
