//! `relgate tools` — Print the tool discovery listing.

use super::CommandResult;
use relgate_security::PathGuard;
use std::process::ExitCode;
use std::sync::Arc;

pub async fn run() -> CommandResult {
    let guard = Arc::new(PathGuard::from_process_env()?);
    let registry = relgate_tools::default_registry(guard);
    let listing = serde_json::json!({ "tools": registry.definitions() });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(ExitCode::SUCCESS)
}
