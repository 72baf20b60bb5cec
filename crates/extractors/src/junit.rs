//! JUnit-style test report extraction.
//!
//! The root is either a single `<testsuite>` or a `<testsuites>` wrapper.
//! Counters are summed across suites; unparsable or missing counters
//! count as zero. Any other root yields an all-zero summary.

use crate::xml::{parse_report, read_report};
use relgate_core::{ExtractError, TestSummary};
use roxmltree::Node;
use std::path::Path;
use tracing::debug;

/// Parse a JUnit XML file into a [`TestSummary`].
pub fn parse_junit_xml(path: &Path) -> Result<TestSummary, ExtractError> {
    debug!(path = %path.display(), "Parsing test report");
    let text = read_report(path)?;
    parse_junit_str(&text, &path.display().to_string())
}

/// Parse JUnit XML already held in memory. `origin` only labels errors.
pub fn parse_junit_str(xml: &str, origin: &str) -> Result<TestSummary, ExtractError> {
    let doc = parse_report(xml, origin)?;
    let root = doc.root_element();

    let mut summary = TestSummary::default();
    match root.tag_name().name() {
        "testsuites" => {
            for suite in children_named(root, "testsuite") {
                accumulate_suite(&mut summary, suite);
            }
        }
        "testsuite" => accumulate_suite(&mut summary, root),
        other => debug!(root = other, "Unrecognised test report root, reporting zeros"),
    }

    debug!(
        total = summary.total,
        failures = summary.failures,
        errors = summary.errors,
        "Test report parsed"
    );
    Ok(summary)
}

fn accumulate_suite(summary: &mut TestSummary, suite: Node<'_, '_>) {
    summary.total = summary.total.saturating_add(count_attr(suite, "tests"));
    summary.failures = summary.failures.saturating_add(count_attr(suite, "failures"));
    summary.errors = summary.errors.saturating_add(count_attr(suite, "errors"));
    summary.skipped = summary.skipped.saturating_add(count_attr(suite, "skipped"));
    summary.time += seconds_attr(suite, "time");

    for case in children_named(suite, "testcase") {
        let failed = case
            .children()
            .any(|c| c.has_tag_name("failure") || c.has_tag_name("error"));
        if failed {
            let name = case.attribute("name").unwrap_or("unknown");
            let classname = case.attribute("classname").unwrap_or("");
            summary.failed_test_names.push(format!("{classname}::{name}"));
        }
    }
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.is_element() && c.has_tag_name(tag))
}

fn count_attr(node: Node<'_, '_>, name: &str) -> u64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn seconds_attr(node: Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites>
  <testsuite name="api" tests="5" failures="1" errors="0" skipped="1" time="1.25">
    <testcase classname="tests.test_api" name="test_health" time="0.01"/>
    <testcase classname="tests.test_api" name="test_login">
      <failure message="assert 401 == 200">Traceback...</failure>
    </testcase>
    <testcase classname="tests.test_api" name="test_skip">
      <skipped/>
    </testcase>
  </testsuite>
  <testsuite name="face" tests="3" failures="0" errors="1" time="0.75">
    <testcase classname="tests.test_face" name="test_embed">
      <error message="RuntimeError">boom</error>
    </testcase>
    <testcase name="test_anonymous">
      <failure/>
    </testcase>
  </testsuite>
</testsuites>"#;

    #[test]
    fn wrapper_sums_every_suite() {
        let s = parse_junit_str(WRAPPED, "mem").unwrap();
        assert_eq!(s.total, 8);
        assert_eq!(s.failures, 1);
        assert_eq!(s.errors, 1);
        assert_eq!(s.skipped, 1);
        assert!((s.time - 2.0).abs() < 1e-9);
    }

    #[test]
    fn failed_names_in_document_order() {
        let s = parse_junit_str(WRAPPED, "mem").unwrap();
        assert_eq!(
            s.failed_test_names,
            vec![
                "tests.test_api::test_login",
                "tests.test_face::test_embed",
                "::test_anonymous",
            ]
        );
    }

    #[test]
    fn two_suite_example() {
        let xml = r#"<testsuites>
            <testsuite tests="5" failures="1"/>
            <testsuite tests="3" failures="0"/>
        </testsuites>"#;
        let s = parse_junit_str(xml, "mem").unwrap();
        assert_eq!(s.total, 8);
        assert_eq!(s.failures, 1);
        assert_eq!(s.errors, 0);
        assert_eq!(s.skipped, 0);
        assert_eq!(s.time, 0.0);
        assert!(s.failed_test_names.is_empty());
    }

    #[test]
    fn single_suite_root() {
        let xml = r#"<testsuite tests="2" failures="0" errors="0" time="0.5">
            <testcase classname="a" name="b"/>
            <testcase name="c"><error/></testcase>
        </testsuite>"#;
        let s = parse_junit_str(xml, "mem").unwrap();
        assert_eq!(s.total, 2);
        assert_eq!(s.failed_test_names, vec!["::c"]);
    }

    #[test]
    fn unparsable_counters_default_to_zero() {
        let xml = r#"<testsuite tests="many" failures="-1" time="fast"/>"#;
        let s = parse_junit_str(xml, "mem").unwrap();
        assert_eq!(s.total, 0);
        assert_eq!(s.failures, 0);
        assert_eq!(s.time, 0.0);
    }

    #[test]
    fn nameless_case_uses_defaults() {
        let xml = r#"<testsuite tests="1"><testcase><failure/></testcase></testsuite>"#;
        let s = parse_junit_str(xml, "mem").unwrap();
        assert_eq!(s.failed_test_names, vec!["::unknown"]);
    }

    #[test]
    fn grandchild_failures_are_not_counted() {
        let xml = r#"<testsuite tests="1">
            <testcase name="x"><system-out><failure/></system-out></testcase>
        </testsuite>"#;
        let s = parse_junit_str(xml, "mem").unwrap();
        assert!(s.failed_test_names.is_empty());
    }

    #[test]
    fn unknown_root_yields_zeros() {
        let s = parse_junit_str("<report><testsuite tests=\"4\"/></report>", "mem").unwrap();
        assert_eq!(s, TestSummary::default());
    }

    #[test]
    fn file_round_trip_and_idempotence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-results.xml");
        std::fs::write(&path, WRAPPED).unwrap();

        let first = parse_junit_xml(&path).unwrap();
        let second = parse_junit_xml(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_junit_xml(&dir.path().join("absent.xml")).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }));
    }

    #[test]
    fn text_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "all tests passed, trust me").unwrap();
        let err = parse_junit_xml(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed { .. }));
    }

    #[test]
    fn utf16_report_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-results.xml");
        let xml = r#"<?xml version="1.0" encoding="UTF-16"?>
<testsuite tests="2" failures="1">
    <testcase classname="ünï" name="t"><failure/></testcase>
</testsuite>"#;
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
        std::fs::write(&path, bytes).unwrap();

        let summary = parse_junit_xml(&path).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed_test_names, vec!["ünï::t"]);
    }
}
