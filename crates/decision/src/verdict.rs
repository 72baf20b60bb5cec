//! Verdict parsing.
//!
//! The service is asked for `{verdict, confidence_score, analysis_summary}`.
//! Markdown fences and leading chatter are tolerated; anything that is not
//! a JSON object is an error. The raw object is kept as-is so it can be
//! written back out untouched.

use crate::DecisionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Fallback text for `release_summary.md`.
pub const NO_SUMMARY: &str = "No summary provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Approved,
    Rejected,
    Unknown,
}

impl Verdict {
    /// Map a service label to a verdict. Unrecognised labels are `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Verdict::Approved,
            "REJECTED" => Verdict::Rejected,
            _ => Verdict::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
            Verdict::Unknown => "UNKNOWN",
        }
    }

    pub fn is_approved(&self) -> bool {
        *self == Verdict::Approved
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed verdict plus the object it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDecision {
    pub verdict: Verdict,
    pub confidence_score: Option<i64>,
    pub analysis_summary: Option<String>,
    pub raw: Value,
}

impl ReleaseDecision {
    /// Text for `release_summary.md`.
    pub fn summary_text(&self) -> &str {
        self.analysis_summary.as_deref().unwrap_or(NO_SUMMARY)
    }
}

fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let clean = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    clean.strip_suffix("```").unwrap_or(clean).trim()
}

/// The first balanced `{...}` in `text`, ignoring braces inside strings.
fn extract_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut start = None;

    for (i, c) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| &text[s..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn confidence(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the service's reply into a [`ReleaseDecision`].
pub fn parse_decision(text: &str) -> Result<ReleaseDecision, DecisionError> {
    let clean = strip_markdown_fences(text);
    let raw: Value = match serde_json::from_str(clean) {
        Ok(v) => v,
        Err(first) => {
            let fragment = extract_json_object(clean).ok_or_else(|| {
                DecisionError::InvalidResponse(format!("no JSON object in response: {first}"))
            })?;
            serde_json::from_str(fragment)
                .map_err(|e| DecisionError::InvalidResponse(format!("invalid JSON: {e}")))?
        }
    };

    let Some(obj) = raw.as_object() else {
        return Err(DecisionError::InvalidResponse(
            "response is not a JSON object".into(),
        ));
    };

    let verdict = obj
        .get("verdict")
        .and_then(Value::as_str)
        .map(Verdict::from_label)
        .unwrap_or(Verdict::Unknown);
    let confidence_score = confidence(obj.get("confidence_score"));
    let analysis_summary = obj
        .get("analysis_summary")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReleaseDecision {
        verdict,
        confidence_score,
        analysis_summary,
        raw,
    })
}
