//! Audit logging — structured record of gateway tool calls.
//!
//! Every dispatched call produces one entry. Entries are forwarded to
//! sinks as they happen; nothing is retained between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
    pub target: String,
    pub outcome: AuditOutcome,
    pub details: Option<String>,
}

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A tool was executed
    ToolExecution { tool_name: String },
    /// Path access was denied by the guard
    PathDenied { tool_name: String },
    /// The request itself was rejected before execution
    InputRejected { tool_name: String },
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    Denied,
}

/// Trait for audit log sinks (where events are written).
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Fan-out audit logger.
pub struct AuditLogger {
    sinks: Vec<Box<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::with_sinks(vec![Box::new(TracingSink)])
    }
}

impl AuditLogger {
    /// Create a new audit logger with the given sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn AuditSink>>) -> Self {
        Self { sinks }
    }

    /// Record an audit event.
    pub fn log(&self, event: AuditEvent, target: &str, outcome: AuditOutcome, details: Option<String>) {
        let entry = AuditEntry {
            timestamp: Utc::now(),
            event,
            target: target.into(),
            outcome,
            details,
        };

        for sink in &self.sinks {
            sink.record(&entry);
        }
    }
}

/// A tracing-based audit sink. Denials are logged at warn, the rest at info.
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, entry: &AuditEntry) {
        if entry.outcome == AuditOutcome::Denied {
            tracing::warn!(
                event = ?entry.event,
                target = %entry.target,
                details = ?entry.details,
                "AUDIT"
            );
        } else {
            tracing::info!(
                event = ?entry.event,
                target = %entry.target,
                outcome = ?entry.outcome,
                details = ?entry.details,
                "AUDIT"
            );
        }
    }
}
