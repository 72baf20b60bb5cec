//! Build log scanning.
//!
//! Lines are classified case-insensitively: `error` or `exception` makes
//! an error line, otherwise `warning` makes a warning line. A line is
//! counted at most once. Stored lines are cut to [`MAX_LINE_CHARS`]
//! characters and each list keeps only the first `max_lines` entries,
//! while the counters report every classified line.

use relgate_core::LogAnalysis;
use tracing::debug;

pub const DEFAULT_MAX_LINES: usize = 50;
pub const MAX_LINE_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Error,
    Warning,
}

fn classify(line: &str) -> Option<LineKind> {
    let lower = line.to_lowercase();
    if lower.contains("error") || lower.contains("exception") {
        Some(LineKind::Error)
    } else if lower.contains("warning") {
        Some(LineKind::Warning)
    } else {
        None
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn truncate_chars(line: &str, max: usize) -> String {
    match line.char_indices().nth(max) {
        Some((idx, _)) => line[..idx].to_string(),
        None => line.to_string(),
    }
}

/// Scan raw log text for error and warning lines.
///
/// Never fails: empty input yields a zero-filled record.
pub fn analyze_logs(content: &str, max_lines: usize) -> LogAnalysis {
    let mut analysis = LogAnalysis::default();

    for line in content.split(is_line_break) {
        match classify(line) {
            Some(LineKind::Error) => {
                analysis.error_count += 1;
                if analysis.critical_errors.len() < max_lines {
                    analysis
                        .critical_errors
                        .push(truncate_chars(line, MAX_LINE_CHARS));
                }
            }
            Some(LineKind::Warning) => {
                analysis.warning_count += 1;
                if analysis.warnings.len() < max_lines {
                    analysis.warnings.push(truncate_chars(line, MAX_LINE_CHARS));
                }
            }
            None => {}
        }
    }

    debug!(
        errors = analysis.error_count,
        warnings = analysis.warning_count,
        "Build log scanned"
    );
    analysis
}
