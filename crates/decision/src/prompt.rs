//! Prompt construction.
//!
//! Records are embedded in their `field=value` display form; the policy
//! thresholds come from configuration.

use crate::facts::ReleaseFacts;
use relgate_config::PolicyConfig;
use relgate_core::Message;
use std::fmt::Write;

const ROLE: &str = "Act as a Senior Release Manager. You review CI/CD results for a Face Verification System and decide whether the build may ship.";

const MISSING: &str = "Missing";

/// Build the system and user messages for one decision.
pub fn build_messages(facts: &ReleaseFacts, policy: &PolicyConfig) -> Vec<Message> {
    vec![Message::system(ROLE), Message::user(build_prompt(facts, policy))]
}

/// The user prompt: the facts, then the rules, then the output contract.
pub fn build_prompt(facts: &ReleaseFacts, policy: &PolicyConfig) -> String {
    let mut out = String::from("Analyze this CI/CD data.\n\nDATA:\n");

    let status = match &facts.tests {
        Some(t) if t.passed() => "PASSED",
        _ => "FAILED",
    };
    let _ = writeln!(out, "1. Unit Tests: {status}");
    match &facts.tests {
        Some(t) => {
            let _ = writeln!(out, "   Details: {t}");
            let _ = writeln!(out, "   Running {} tests.", t.total);
        }
        None => {
            let _ = writeln!(out, "   Details: {MISSING}");
            let _ = writeln!(out, "   Running 0 tests.");
        }
    }

    let coverage = facts
        .coverage
        .as_ref()
        .map(|c| c.line_rate.to_string())
        .unwrap_or_else(|| MISSING.to_string());
    let _ = writeln!(out, "2. Coverage: {coverage} (Min: {})", policy.min_coverage);

    let face = facts
        .security
        .face_threshold
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string());
    let _ = writeln!(
        out,
        "3. Config: Face Threshold {face} (Max Safe: {})",
        policy.max_face_threshold
    );
    let _ = writeln!(out, "   Details: {}", facts.security);

    if let Some(logs) = &facts.logs {
        let _ = writeln!(out, "4. Build Log: {logs}");
    }

    let _ = write!(
        out,
        "\nTASK:\n\
         - If Test Failures > 0 => REJECT.\n\
         - If Config Threshold > {max} => REJECT (Security Risk).\n\
         - If Coverage < {min} => WARNING or REJECT.\n\
         \n\
         Output JSON with fields: verdict (APPROVED/REJECTED), confidence_score (int), analysis_summary (string).\n",
        max = policy.max_face_threshold,
        min = policy.min_coverage,
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgate_core::{CoverageSummary, LogAnalysis, Role, SecurityConfig, TestSummary};

    fn facts() -> ReleaseFacts {
        ReleaseFacts {
            tests: Some(TestSummary {
                total: 8,
                failures: 1,
                failed_test_names: vec!["auth::login".into()],
                ..TestSummary::default()
            }),
            coverage: Some(CoverageSummary {
                line_rate: 0.82,
                ..CoverageSummary::default()
            }),
            security: SecurityConfig {
                face_threshold: Some(0.6),
                liveness_min_frames: Some(10),
            },
            logs: None,
        }
    }

    #[test]
    fn embeds_facts_and_thresholds() {
        let prompt = build_prompt(&facts(), &PolicyConfig::default());
        assert!(prompt.contains("1. Unit Tests: FAILED"));
        assert!(prompt.contains("failed_test_names=[\"auth::login\"]"));
        assert!(prompt.contains("Running 8 tests."));
        assert!(prompt.contains("2. Coverage: 0.82 (Min: 0.75)"));
        assert!(prompt.contains("Face Threshold 0.6 (Max Safe: 0.55)"));
        assert!(prompt.contains("If Config Threshold > 0.55 => REJECT"));
        assert!(!prompt.contains("Build Log"));
    }

    #[test]
    fn missing_facts_are_marked() {
        let prompt = build_prompt(&ReleaseFacts::default(), &PolicyConfig::default());
        assert!(prompt.contains("1. Unit Tests: FAILED"));
        assert!(prompt.contains("Details: Missing"));
        assert!(prompt.contains("2. Coverage: Missing"));
        assert!(prompt.contains("Face Threshold None"));
    }

    #[test]
    fn passing_tests_and_logs() {
        let mut f = facts();
        f.tests = Some(TestSummary {
            total: 4,
            ..TestSummary::default()
        });
        f.logs = Some(LogAnalysis {
            error_count: 2,
            ..LogAnalysis::default()
        });
        let prompt = build_prompt(&f, &PolicyConfig::default());
        assert!(prompt.contains("1. Unit Tests: PASSED"));
        assert!(prompt.contains("4. Build Log: error_count=2"));
    }

    #[test]
    fn custom_policy_flows_through() {
        let policy = PolicyConfig {
            min_coverage: 0.9,
            max_face_threshold: 0.4,
        };
        let prompt = build_prompt(&facts(), &policy);
        assert!(prompt.contains("(Min: 0.9)"));
        assert!(prompt.contains("If Coverage < 0.9"));
        assert!(prompt.contains("(Max Safe: 0.4)"));
    }

    #[test]
    fn messages_have_system_then_user() {
        let messages = build_messages(&facts(), &PolicyConfig::default());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }
}
