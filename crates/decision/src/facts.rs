//! Release facts — the extractor outputs a verdict is based on.

use relgate_config::{ArtifactsConfig, SecurityPathsConfig};
use relgate_core::{CoverageSummary, LogAnalysis, SecurityConfig, TestSummary};
use relgate_extractors::{
    DEFAULT_MAX_LINES, analyze_logs, parse_cobertura_xml, parse_junit_xml, read_security_config,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Every file a decision run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub test_results: PathBuf,
    pub coverage: PathBuf,
    pub build_log: PathBuf,
    pub security_config: PathBuf,
    pub summary: PathBuf,
    pub decision: PathBuf,
}

impl ArtifactPaths {
    /// Lay out paths under `artifacts_dir` and `repo_root`.
    pub fn new(
        artifacts_dir: &Path,
        repo_root: &Path,
        artifacts: &ArtifactsConfig,
        security: &SecurityPathsConfig,
    ) -> Self {
        Self {
            test_results: artifacts_dir.join(&artifacts.test_results),
            coverage: artifacts_dir.join(&artifacts.coverage),
            build_log: artifacts_dir.join(&artifacts.build_log),
            security_config: repo_root.join(&security.config_path),
            summary: artifacts_dir.join(&artifacts.summary),
            decision: artifacts_dir.join(&artifacts.decision),
        }
    }

    /// Default file names under `artifacts_dir` and `repo_root`.
    pub fn with_defaults(artifacts_dir: &Path, repo_root: &Path) -> Self {
        Self::new(
            artifacts_dir,
            repo_root,
            &ArtifactsConfig::default(),
            &SecurityPathsConfig::default(),
        )
    }
}

/// Extractor outputs for one release. `None` means the fact is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseFacts {
    pub tests: Option<TestSummary>,
    pub coverage: Option<CoverageSummary>,
    pub security: SecurityConfig,
    /// Only present when a build log was shipped with the artifacts.
    pub logs: Option<LogAnalysis>,
}

impl ReleaseFacts {
    /// Run every extractor, degrading failures instead of propagating them.
    pub fn gather(paths: &ArtifactPaths) -> Self {
        info!(path = %paths.test_results.display(), "Reading test results");
        let tests = match parse_junit_xml(&paths.test_results) {
            Ok(t) => {
                info!(total = t.total, failures = t.failures, errors = t.errors, "Tests read");
                Some(t)
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse tests, marking missing");
                None
            }
        };

        info!(path = %paths.coverage.display(), "Reading coverage");
        let coverage = match parse_cobertura_xml(&paths.coverage) {
            Ok(c) => {
                info!(line_rate = c.line_rate, "Coverage read");
                Some(c)
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse coverage, marking missing");
                None
            }
        };

        info!(path = %paths.security_config.display(), "Reading security config");
        let security = read_security_config(&paths.security_config).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read security config, reporting absent values");
            SecurityConfig::default()
        });
        info!(face_threshold = ?security.face_threshold, "Security config read");

        let logs = read_build_log(&paths.build_log);

        Self {
            tests,
            coverage,
            security,
            logs,
        }
    }
}

fn read_build_log(path: &Path) -> Option<LogAnalysis> {
    if !path.exists() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            let analysis = analyze_logs(&String::from_utf8_lossy(&bytes), DEFAULT_MAX_LINES);
            info!(
                errors = analysis.error_count,
                warnings = analysis.warning_count,
                "Build log scanned"
            );
            Some(analysis)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read build log, skipping");
            None
        }
    }
}
