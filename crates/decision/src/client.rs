//! The decision client: facts in, verdict and artifacts out.

use crate::facts::{ArtifactPaths, ReleaseFacts};
use crate::prompt::build_messages;
use crate::verdict::{ReleaseDecision, parse_decision};
use crate::DecisionError;
use relgate_config::PolicyConfig;
use relgate_core::{Provider, ProviderRequest};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Asks a [`Provider`] for a release verdict.
pub struct DecisionClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    policy: PolicyConfig,
}

impl DecisionClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            policy: PolicyConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Ask for a verdict on already-gathered facts.
    pub async fn decide(&self, facts: &ReleaseFacts) -> Result<ReleaseDecision, DecisionError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: build_messages(facts, &self.policy),
            temperature: self.temperature,
            max_tokens: None,
            json_output: true,
        };

        info!(provider = self.provider.name(), model = %self.model, "Requesting release verdict");
        let response = self.provider.complete(request).await?;
        debug!(content = %response.message.content, "Decision service replied");

        parse_decision(&response.message.content)
    }

    /// Gather facts, decide, and write the summary and decision files.
    pub async fn run(&self, paths: &ArtifactPaths) -> Result<ReleaseDecision, DecisionError> {
        let gather_paths = paths.clone();
        let facts = tokio::task::spawn_blocking(move || ReleaseFacts::gather(&gather_paths))
            .await
            .map_err(|e| DecisionError::Gather(e.to_string()))?;

        let decision = self.decide(&facts).await?;
        info!(verdict = %decision.verdict, confidence = ?decision.confidence_score, "Verdict received");

        write_artifacts(&decision, paths).await?;
        Ok(decision)
    }
}

/// Write `release_summary.md` and `release_decision.json`.
pub async fn write_artifacts(
    decision: &ReleaseDecision,
    paths: &ArtifactPaths,
) -> Result<(), DecisionError> {
    write_file(&paths.summary, decision.summary_text().as_bytes()).await?;
    let json = serde_json::to_string_pretty(&decision.raw)?;
    write_file(&paths.decision, json.as_bytes()).await?;
    info!(
        summary = %paths.summary.display(),
        decision = %paths.decision.display(),
        "Release artifacts written"
    );
    Ok(())
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), DecisionError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| DecisionError::Write {
            path: path.to_path_buf(),
            source,
        })
}
