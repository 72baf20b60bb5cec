//! `relgate inspect` — Run one extractor on a local file.
//!
//! Runs without the path guard: this is an operator command, not the
//! caller-facing gateway.

use super::CommandResult;
use relgate_extractors::{analyze_logs, parse_cobertura_xml, parse_junit_xml, read_security_config};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Kind {
    /// JUnit test report
    Tests,
    /// Cobertura coverage report
    Coverage,
    /// Security constants in a config source file
    Security,
    /// Raw build log
    Logs,
}

fn emit<T: Serialize>(record: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(ExitCode::SUCCESS)
}

pub async fn run(kind: Kind, path: &Path, max_lines: usize) -> CommandResult {
    match kind {
        Kind::Tests => emit(&parse_junit_xml(path)?),
        Kind::Coverage => emit(&parse_cobertura_xml(path)?),
        Kind::Security => emit(&read_security_config(path)?),
        Kind::Logs => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            emit(&analyze_logs(&String::from_utf8_lossy(&bytes), max_lines))
        }
    }
}
