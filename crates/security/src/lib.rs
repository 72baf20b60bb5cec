//! Security module for relgate — path confinement and audit logging.
//!
//! Provides:
//! - **Path guard**: confine caller-supplied paths to a fixed allow-list
//! - **Audit logging**: structured record of tool calls and denials

pub mod audit;
pub mod path;

pub use audit::{AuditEntry, AuditEvent, AuditLogger, AuditOutcome, AuditSink, TracingSink};
pub use path::{ARTIFACTS_DIR, PathGuard, PathValidationError, resolve_path};
