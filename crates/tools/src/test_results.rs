//! `get_test_results` — summarise a JUnit-style report.

use async_trait::async_trait;
use relgate_core::error::ToolError;
use relgate_core::tool::{Tool, ToolResult};
use relgate_extractors::parse_junit_xml;
use relgate_security::PathGuard;
use std::sync::Arc;

const NAME: &str = "get_test_results";

pub struct TestResultsTool {
    guard: Arc<PathGuard>,
}

impl TestResultsTool {
    pub fn new(guard: Arc<PathGuard>) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Tool for TestResultsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Parse a JUnit XML test report and return totals, failures, errors, skipped, time and the names of failed tests."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "xml_path": {
                    "type": "string",
                    "description": "Path to the JUnit XML report"
                }
            },
            "required": ["xml_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw = crate::required_str(&arguments, "xml_path")?;
        let path = crate::confine(&self.guard, NAME, raw)?;
        crate::run_extractor(NAME, move || parse_junit_xml(&path)).await
    }
}
