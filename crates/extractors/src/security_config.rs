//! Security constant scraping.
//!
//! The configuration source is scanned as plain text and never executed
//! or imported. Which constants are extracted is driven by
//! [`SECURITY_CONSTANTS`]: each rule names the record field, the pattern
//! whose first capture group holds the value, and how to coerce it.
//! Every rule is matched independently against the whole text and the
//! first match wins.

use regex::Regex;
use relgate_core::{ExtractError, SecurityConfig};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// How a captured value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Integer,
}

/// One extracted constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    Float(f64),
    Integer(i64),
}

/// A declarative extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRule {
    /// Record field the value lands in.
    pub field: &'static str,
    /// Regex with the value in capture group 1.
    pub pattern: &'static str,
    pub kind: ValueKind,
}

pub const SECURITY_CONSTANTS: &[ConstantRule] = &[
    ConstantRule {
        field: "face_threshold",
        pattern: r"face_detection_threshold.*=\s*([0-9.]+)",
        kind: ValueKind::Float,
    },
    ConstantRule {
        field: "liveness_min_frames",
        pattern: r"liveness_min_valid_frames.*=\s*(\d+)",
        kind: ValueKind::Integer,
    },
];

/// A compiled rule table.
#[derive(Debug)]
pub struct ConstantScanner {
    rules: Vec<(ConstantRule, Regex)>,
}

impl ConstantScanner {
    pub fn new(rules: &[ConstantRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Regex::new(rule.pattern).map(|re| (*rule, re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Scan `text` and return every constant found, keyed by field.
    ///
    /// Fields with no match are simply missing from the map. A match whose
    /// capture cannot be coerced (e.g. `1.2.3` for a float) is an error.
    pub fn scan(&self, text: &str) -> Result<BTreeMap<&'static str, ConstantValue>, String> {
        let mut found = BTreeMap::new();
        for (rule, re) in &self.rules {
            let Some(raw) = re.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            let raw = raw.as_str();
            let value = match rule.kind {
                ValueKind::Float => raw
                    .parse::<f64>()
                    .map(ConstantValue::Float)
                    .map_err(|e| format!("{}: '{raw}' is not a float: {e}", rule.field))?,
                ValueKind::Integer => raw
                    .parse::<i64>()
                    .map(ConstantValue::Integer)
                    .map_err(|e| format!("{}: '{raw}' is not an integer: {e}", rule.field))?,
            };
            found.insert(rule.field, value);
        }
        Ok(found)
    }
}

static SECURITY_SCANNER: LazyLock<ConstantScanner> = LazyLock::new(|| {
    ConstantScanner::new(SECURITY_CONSTANTS).expect("built-in security patterns are valid")
});

/// Read security constants from a configuration source file.
///
/// A missing file is not an error: it yields a record with every field
/// absent. Read failures (including non-UTF-8 content) are `Io`.
pub fn read_security_config(path: &Path) -> Result<SecurityConfig, ExtractError> {
    let shown = path.display().to_string();
    if !path.exists() {
        debug!(path = %shown, "No security config present, reporting absent values");
        return Ok(SecurityConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    scan_security_config(&text).map_err(|reason| ExtractError::Parse {
        path: shown,
        reason,
    })
}

/// Scan configuration text already held in memory.
pub fn scan_security_config(text: &str) -> Result<SecurityConfig, String> {
    let found = SECURITY_SCANNER.scan(text)?;

    let face_threshold = match found.get("face_threshold") {
        Some(ConstantValue::Float(v)) => Some(*v),
        _ => None,
    };
    let liveness_min_frames = match found.get("liveness_min_frames") {
        Some(ConstantValue::Integer(v)) => Some(*v),
        _ => None,
    };

    debug!(?face_threshold, ?liveness_min_frames, "Security constants scanned");
    Ok(SecurityConfig {
        face_threshold,
        liveness_min_frames,
    })
}
