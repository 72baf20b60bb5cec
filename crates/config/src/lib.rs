//! Configuration loading and validation for relgate.
//!
//! Loads `relgate.toml` (or an explicit path) with environment variable
//! overrides. Every field has a default, so a missing file is fine.
//!
//! The path guard's allow-list is deliberately absent from this file: it
//! is fixed at process start and not configurable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "relgate.toml";

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the decision service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Decision service connection
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Release thresholds handed to the decision service
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Artifact file names inside the artifacts directory
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// Where the security constants live
    #[serde(default)]
    pub security: SecurityPathsConfig,

    /// Tool gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("policy", &self.policy)
            .field("artifacts", &self.artifacts)
            .field("security", &self.security)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// OpenAI-compatible base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "gemini".into()
}
fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_model() -> String {
    "gemini-1.5-pro".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_request_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Coverage below this line rate warrants a warning or rejection
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,

    /// Face-match thresholds above this are a security risk
    #[serde(default = "default_max_face_threshold")]
    pub max_face_threshold: f64,
}

fn default_min_coverage() -> f64 {
    0.75
}
fn default_max_face_threshold() -> f64 {
    0.55
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
            max_face_threshold: default_max_face_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_test_results")]
    pub test_results: String,

    #[serde(default = "default_coverage")]
    pub coverage: String,

    /// Optional; skipped when the file is absent
    #[serde(default = "default_build_log")]
    pub build_log: String,

    #[serde(default = "default_summary")]
    pub summary: String,

    #[serde(default = "default_decision")]
    pub decision: String,
}

fn default_test_results() -> String {
    "test-results.xml".into()
}
fn default_coverage() -> String {
    "coverage.xml".into()
}
fn default_build_log() -> String {
    "build.log".into()
}
fn default_summary() -> String {
    "release_summary.md".into()
}
fn default_decision() -> String {
    "release_decision.json".into()
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            test_results: default_test_results(),
            coverage: default_coverage(),
            build_log: default_build_log(),
            summary: default_summary(),
            decision: default_decision(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPathsConfig {
    /// Configuration source, relative to the repository root
    #[serde(default = "default_security_config_path")]
    pub config_path: String,
}

fn default_security_config_path() -> String {
    "Face_detection_back/app/config.py".into()
}

impl Default for SecurityPathsConfig {
    fn default() -> Self {
        Self {
            config_path: default_security_config_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upper bound on a single tool call
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
}

fn default_tool_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (or `./relgate.toml`) and apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("RELGATE_API_KEY").or_else(|| lookup("GEMINI_API_KEY"));
        }

        if let Some(model) = lookup("RELGATE_MODEL") {
            self.provider.model = model;
        }

        if let Some(url) = lookup("RELGATE_API_URL") {
            self.provider.api_url = url;
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.policy.min_coverage) {
            return Err(ConfigError::ValidationError(
                "policy.min_coverage must be between 0.0 and 1.0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.policy.max_face_threshold) {
            return Err(ConfigError::ValidationError(
                "policy.max_face_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.gateway.tool_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.tool_timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            policy: PolicyConfig::default(),
            artifacts: ArtifactsConfig::default(),
            security: SecurityPathsConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy.min_coverage, 0.75);
        assert_eq!(config.policy.max_face_threshold, 0.55);
        assert_eq!(config.artifacts.test_results, "test-results.xml");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider.model, config.provider.model);
        assert_eq!(parsed.gateway.tool_timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relgate.toml");
        std::fs::write(
            &path,
            "[policy]\nmin_coverage = 0.9\n\n[security]\nconfig_path = \"app/settings.py\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.policy.min_coverage, 0.9);
        assert_eq!(config.policy.max_face_threshold, 0.55);
        assert_eq!(config.security.config_path, "app/settings.py");
        assert_eq!(config.provider.name, "gemini");
    }

    #[test]
    fn invalid_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relgate.toml");
        std::fs::write(&path, "[policy]\nmin_coverage = 75\n").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.provider.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relgate.toml");
        std::fs::write(&path, "[policy\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/relgate.toml")).unwrap();
        assert_eq!(config.provider.name, "gemini");
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "g-key"),
            ("RELGATE_MODEL", "gemini-2.0-flash"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.provider.model, "gemini-2.0-flash");
    }

    #[test]
    fn relgate_key_preferred_and_file_key_kept() {
        let env: HashMap<&str, &str> = [("RELGATE_API_KEY", "r-key"), ("GEMINI_API_KEY", "g-key")]
            .into_iter()
            .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("r-key"));

        let mut from_file = AppConfig {
            api_key: Some("file-key".into()),
            ..AppConfig::default()
        };
        from_file.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(from_file.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let dbg = format!("{config:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("super-secret"));
    }
}
