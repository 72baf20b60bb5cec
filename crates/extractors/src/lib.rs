//! Artifact extractors for relgate.
//!
//! Four functions, one per artifact kind. Each reads its input and either
//! returns a fresh record or an `ExtractError`. None of them keeps state
//! between calls, so calling one twice on an unchanged artifact yields
//! identical records.
//!
//! - [`junit`] — JUnit-style test reports
//! - [`cobertura`] — Cobertura-style coverage reports
//! - [`security_config`] — security constants scraped from source text
//! - [`logs`] — error/warning lines in raw build logs

pub mod cobertura;
pub mod junit;
pub mod logs;
pub mod security_config;

mod xml;

pub use cobertura::parse_cobertura_xml;
pub use junit::parse_junit_xml;
pub use logs::{DEFAULT_MAX_LINES, analyze_logs};
pub use security_config::read_security_config;
