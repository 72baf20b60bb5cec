//! Extraction records — one value per extractor call.
//!
//! Every record has two renderings derived from the same value:
//! `Display` gives a single line of `field=value` pairs for embedding in
//! a natural-language prompt, and `Serialize` gives the strict JSON form
//! returned by the tool gateway. Field names are part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a JUnit-style test report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    /// Summed suite duration in seconds.
    pub time: f64,
    /// `"<classname>::<name>"` per failing case, in document order.
    pub failed_test_names: Vec<String>,
}

impl TestSummary {
    /// No failures and no errors were reported.
    ///
    /// Cross-field consistency is not checked; a malformed report with
    /// `failures > total` still answers from the counters alone.
    pub fn passed(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

/// Summary of a Cobertura-style coverage report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Taken verbatim from the report; not clamped.
    pub line_rate: f64,
    /// Reserved, always 0.
    pub total_lines: u64,
    /// Reserved, always 0.
    pub covered_lines: u64,
}

/// Security constants scraped from a project configuration source.
///
/// Both fields absent is a valid state: the file may not exist or may not
/// override either constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub face_threshold: Option<f64>,
    pub liveness_min_frames: Option<i64>,
}

impl SecurityConfig {
    pub fn is_empty(&self) -> bool {
        self.face_threshold.is_none() && self.liveness_min_frames.is_none()
    }
}

/// Error and warning lines found in a build log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogAnalysis {
    /// Total classified error lines, not bounded by `max_lines`.
    pub error_count: u64,
    pub warning_count: u64,
    pub critical_errors: Vec<String>,
    pub warnings: Vec<String>,
}

struct OptDisplay<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OptDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} failures={} errors={} skipped={} time={} failed_test_names={:?}",
            self.total, self.failures, self.errors, self.skipped, self.time, self.failed_test_names
        )
    }
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line_rate={} total_lines={} covered_lines={}",
            self.line_rate, self.total_lines, self.covered_lines
        )
    }
}

impl fmt::Display for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "face_threshold={} liveness_min_frames={}",
            OptDisplay(&self.face_threshold),
            OptDisplay(&self.liveness_min_frames)
        )
    }
}

impl fmt::Display for LogAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error_count={} warning_count={} critical_errors={:?} warnings={:?}",
            self.error_count, self.warning_count, self.critical_errors, self.warnings
        )
    }
}
