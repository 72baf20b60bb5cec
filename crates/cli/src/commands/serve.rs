//! `relgate serve` — Run the MCP tool gateway over stdin/stdout.

use super::CommandResult;
use relgate_config::AppConfig;
use relgate_gateway::Gateway;
use relgate_security::PathGuard;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    let config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let guard = PathGuard::from_process_env()?;
    info!(roots = ?guard.roots(), "Allowed roots");

    let registry = relgate_tools::default_registry(Arc::new(guard));
    let gateway = Gateway::new(Arc::new(registry))
        .with_timeout(Duration::from_secs(config.gateway.tool_timeout_secs));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    relgate_gateway::serve(gateway, stdin, tokio::io::stdout()).await?;
    Ok(ExitCode::SUCCESS)
}
