//! `relgate decide` — Gather release facts and ask for a verdict.
//!
//! Exits 0 only when the verdict is APPROVED.

use super::CommandResult;
use relgate_config::AppConfig;
use relgate_decision::{ArtifactPaths, DecisionClient};
use relgate_providers::OpenAiCompatProvider;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

pub async fn run(config_path: Option<&Path>, artifacts: &Path, repo_root: &Path) -> CommandResult {
    let config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = match OpenAiCompatProvider::from_config(&config.provider, config.api_key.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(model = %config.provider.model, "Starting release decision");

    let paths = ArtifactPaths::new(artifacts, repo_root, &config.artifacts, &config.security);
    let client = DecisionClient::new(Arc::new(provider), config.provider.model.clone())
        .with_policy(config.policy.clone())
        .with_temperature(config.provider.temperature);

    let decision = match client.run(&paths).await {
        Ok(d) => d,
        Err(e) => {
            error!("Release analysis failed: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{}", "-".repeat(40));
    println!("VERDICT: {}", decision.verdict);
    println!("{}", "-".repeat(40));

    Ok(if decision.verdict.is_approved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
