//! Release verdict client for relgate.
//!
//! A one-shot consumer of the extractors: gather the release facts from a
//! CI artifacts directory, ask the decision service for a verdict, and
//! persist the result next to the artifacts.
//!
//! Extraction failures never abort a run. A test or coverage report that
//! cannot be read is marked missing in the prompt; a security config that
//! cannot be read is reported as all-absent.

pub mod client;
pub mod facts;
pub mod prompt;
pub mod verdict;

pub use client::{DecisionClient, write_artifacts};
pub use facts::{ArtifactPaths, ReleaseFacts};
pub use prompt::build_messages;
pub use verdict::{NO_SUMMARY, ReleaseDecision, Verdict, parse_decision};

use relgate_core::ProviderError;
use std::path::PathBuf;

/// Failures that stop a decision run.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("Decision service failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Decision service returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Fact gathering task failed: {0}")]
    Gather(String),
}
