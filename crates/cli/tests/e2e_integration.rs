//! End-to-end integration tests for relgate.
//!
//! These tests exercise the two full pipelines: an MCP client talking to
//! the tool gateway over an in-memory stream, and a decision run from an
//! artifacts directory to the written verdict files.

use std::path::Path;
use std::sync::{Arc, Mutex};

use relgate_config::AppConfig;
use relgate_core::error::ProviderError;
use relgate_core::message::Message;
use relgate_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use relgate_core::{SecurityConfig, TestSummary};
use relgate_decision::{ArtifactPaths, DecisionClient, NO_SUMMARY, Verdict};
use relgate_gateway::Gateway;
use relgate_security::PathGuard;
use relgate_tools::default_registry;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Value, json};
use tokio::io::BufReader;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns one scripted reply and records the prompt.
struct ScriptedProvider {
    reply: String,
    prompts: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn text(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        let prompts = self.prompts.lock().unwrap();
        prompts
            .last()
            .and_then(|r| r.messages.last())
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.prompts.lock().unwrap().push(request);
        Ok(ProviderResponse {
            message: Message::assistant(self.reply.clone()),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

const FAILING_REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites>
  <testsuite name="api" tests="5" failures="1" errors="0" skipped="0" time="1.5">
    <testcase classname="api.auth" name="test_login"><failure message="401"/></testcase>
    <testcase classname="api.auth" name="test_logout"/>
  </testsuite>
  <testsuite name="face" tests="3" failures="0" errors="0" skipped="1" time="0.5">
    <testcase classname="face.match" name="test_threshold"/>
  </testsuite>
</testsuites>"#;

const PASSING_REPORT: &str = r#"<testsuite tests="4" failures="0" errors="0" skipped="0" time="0.2"/>"#;

fn write_artifacts(root: &Path, report: &str, face_threshold: &str) -> ArtifactPaths {
    let artifacts = root.join("artifacts");
    std::fs::create_dir_all(&artifacts).unwrap();
    let paths = ArtifactPaths::with_defaults(&artifacts, root);
    std::fs::write(&paths.test_results, report).unwrap();
    std::fs::write(&paths.coverage, r#"<coverage line-rate="0.82" version="7.4"/>"#).unwrap();
    std::fs::write(
        &paths.build_log,
        "Compiling app\nwarning: unused import\nERROR: flaky network\nok\n",
    )
    .unwrap();
    std::fs::create_dir_all(paths.security_config.parent().unwrap()).unwrap();
    std::fs::write(
        &paths.security_config,
        format!(
            "class Settings:\n    face_detection_threshold: float = {face_threshold}\n    liveness_min_valid_frames: int = 10\n"
        ),
    )
    .unwrap();
    paths
}

async fn connect(gateway: Gateway) -> RunningService<RoleClient, ()> {
    let (client_end, server_end) = tokio::io::duplex(64 * 1024);
    let (read, write) = tokio::io::split(server_end);
    tokio::spawn(relgate_gateway::serve(gateway, BufReader::new(read), write));
    ().serve(client_end).await.unwrap()
}

async fn call(client: &RunningService<RoleClient, ()>, name: &str, arguments: Value) -> CallToolResult {
    client
        .call_tool(CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        })
        .await
        .unwrap()
}

fn text_of(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .unwrap_or("")
}

// ── E2E: Tool gateway session ────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_full_session() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), FAILING_REPORT, "0.6");
    let guard = Arc::new(PathGuard::new([dir.path()]));
    let client = connect(Gateway::new(Arc::new(default_registry(guard)))).await;

    assert_eq!(
        client.peer_info().unwrap().server_info.name,
        "ai-release-manager-tools"
    );
    let listing = client.list_tools(Default::default()).await.unwrap();
    assert_eq!(listing.tools.len(), 4);

    let replies = [
        call(&client, "get_test_results", json!({"xml_path": paths.test_results})).await,
        call(&client, "get_coverage_report", json!({"xml_path": paths.coverage})).await,
        call(&client, "check_security_constants", json!({"config_path": paths.security_config})).await,
        call(&client, "scan_build_logs", json!({"log_text": "ERROR: boom\nWarning: low disk\nok", "max_lines": 1})).await,
    ];

    let tests: TestSummary = serde_json::from_str(text_of(&replies[0])).unwrap();
    assert_eq!(tests.total, 8);
    assert_eq!(tests.failures, 1);
    assert_eq!(tests.skipped, 1);
    assert_eq!(tests.failed_test_names, vec!["api.auth::test_login"]);
    assert!((tests.time - 2.0).abs() < 1e-9);

    let coverage: Value = serde_json::from_str(text_of(&replies[1])).unwrap();
    assert_eq!(coverage["line_rate"], 0.82);
    assert_eq!(coverage["covered_lines"], 0);

    let security: SecurityConfig = serde_json::from_str(text_of(&replies[2])).unwrap();
    assert_eq!(security.face_threshold, Some(0.6));
    assert_eq!(security.liveness_min_frames, Some(10));

    let logs: Value = serde_json::from_str(text_of(&replies[3])).unwrap();
    assert_eq!(logs["critical_errors"], json!(["ERROR: boom"]));
    assert_eq!(logs["warnings"], json!(["Warning: low disk"]));

    for reply in &replies {
        assert_eq!(reply.is_error, Some(false));
    }
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn e2e_gateway_never_faults_on_bad_requests() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("workspace");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("notes.txt"), "plain text, not xml").unwrap();
    let guard = Arc::new(PathGuard::new([&root]));
    let client = connect(Gateway::new(Arc::new(default_registry(guard)))).await;

    let traversal = format!("{}/../../../etc/passwd", root.display());
    let replies = [
        call(&client, "get_test_results", json!({"xml_path": traversal})).await,
        call(&client, "get_test_results", json!({"xml_path": root.join("missing.xml")})).await,
        call(&client, "get_coverage_report", json!({"xml_path": root.join("notes.txt")})).await,
        call(&client, "delete_everything", json!({})).await,
        call(&client, "scan_build_logs", json!({"log_text": "x".repeat(1_000_001)})).await,
        call(&client, "check_security_constants", json!({})).await,
    ];

    assert!(text_of(&replies[0]).starts_with("Error: Permission denied - "));
    assert!(text_of(&replies[1]).starts_with("Error: File not found - "));
    assert!(text_of(&replies[2]).starts_with("Error: Execution failed - "));
    assert_eq!(
        text_of(&replies[3]),
        "Error: Invalid input - Unknown tool: delete_everything"
    );
    assert!(text_of(&replies[4]).starts_with("Error: Invalid input - "));
    assert!(text_of(&replies[5]).starts_with("Error: Invalid input - "));
    for reply in &replies {
        assert_eq!(reply.is_error, Some(true));
    }

    // The session is still alive after every failure.
    let listing = client.list_tools(Default::default()).await.unwrap();
    assert_eq!(listing.tools.len(), 4);
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn e2e_gateway_repeated_calls_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), FAILING_REPORT, "0.5");
    let guard = Arc::new(PathGuard::new([dir.path()]));
    let gateway = Gateway::new(Arc::new(default_registry(guard)));

    let args = json!({"xml_path": paths.test_results});
    let first = gateway.dispatch("get_test_results", args.clone()).await;
    let second = gateway.dispatch("get_test_results", args).await;
    assert_eq!(first, second);
}

// ── E2E: Decision pipeline ───────────────────────────────────────────────

#[tokio::test]
async fn e2e_decision_rejects_risky_release() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), FAILING_REPORT, "0.6");
    let provider = ScriptedProvider::text(
        "```json\n{\"verdict\": \"REJECTED\", \"confidence_score\": 97, \"analysis_summary\": \"1 failing test and an unsafe face threshold.\"}\n```",
    );
    let client = DecisionClient::new(provider.clone(), "gemini-1.5-pro");

    let decision = client.run(&paths).await.unwrap();
    assert_eq!(decision.verdict, Verdict::Rejected);
    assert_eq!(decision.confidence_score, Some(97));

    let prompt = provider.last_prompt();
    assert!(prompt.contains("1. Unit Tests: FAILED"));
    assert!(prompt.contains("api.auth::test_login"));
    assert!(prompt.contains("2. Coverage: 0.82 (Min: 0.75)"));
    assert!(prompt.contains("Face Threshold 0.6 (Max Safe: 0.55)"));
    assert!(prompt.contains("4. Build Log: error_count=1 warning_count=1"));

    assert_eq!(
        std::fs::read_to_string(&paths.summary).unwrap(),
        "1 failing test and an unsafe face threshold."
    );
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.decision).unwrap()).unwrap();
    assert_eq!(written["verdict"], "REJECTED");
}

#[tokio::test]
async fn e2e_decision_approves_clean_release() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), PASSING_REPORT, "0.5");
    let provider = ScriptedProvider::text(r#"{"verdict":"APPROVED","confidence_score":88}"#);
    let client = DecisionClient::new(provider.clone(), "gemini-1.5-pro");

    let decision = client.run(&paths).await.unwrap();
    assert!(decision.verdict.is_approved());
    assert!(provider.last_prompt().contains("1. Unit Tests: PASSED"));
    assert_eq!(std::fs::read_to_string(&paths.summary).unwrap(), NO_SUMMARY);
}

#[tokio::test]
async fn e2e_decision_survives_missing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::with_defaults(dir.path(), dir.path());
    let provider = ScriptedProvider::text(r#"{"verdict":"REJECTED","analysis_summary":"No data."}"#);
    let client = DecisionClient::new(provider.clone(), "m");

    let decision = client.run(&paths).await.unwrap();
    assert_eq!(decision.verdict, Verdict::Rejected);

    let prompt = provider.last_prompt();
    assert!(prompt.contains("Details: Missing"));
    assert!(prompt.contains("2. Coverage: Missing"));
    assert!(prompt.contains("Face Threshold None"));
    assert!(!prompt.contains("Build Log"));
    assert!(paths.decision.exists());
}

#[tokio::test]
async fn e2e_config_drives_paths_and_policy() {
    let dir = tempfile::tempdir().unwrap();
    let config_file = dir.path().join("relgate.toml");
    std::fs::write(
        &config_file,
        r#"
[policy]
min_coverage = 0.9
max_face_threshold = 0.5

[artifacts]
test_results = "junit.xml"

[security]
config_path = "settings.py"
"#,
    )
    .unwrap();
    let config = AppConfig::load_from(&config_file).unwrap();

    let paths = ArtifactPaths::new(dir.path(), dir.path(), &config.artifacts, &config.security);
    std::fs::write(&paths.test_results, PASSING_REPORT).unwrap();
    std::fs::write(&paths.security_config, "face_detection_threshold = 0.45\n").unwrap();

    let provider = ScriptedProvider::text(r#"{"verdict":"UNSURE"}"#);
    let client = DecisionClient::new(provider.clone(), config.provider.model.clone())
        .with_policy(config.policy.clone());

    let decision = client.run(&paths).await.unwrap();
    assert_eq!(decision.verdict, Verdict::Unknown);
    assert!(!decision.verdict.is_approved());

    let prompt = provider.last_prompt();
    assert!(prompt.contains("Running 4 tests."));
    assert!(prompt.contains("(Min: 0.9)"));
    assert!(prompt.contains("Face Threshold 0.45 (Max Safe: 0.5)"));
}
