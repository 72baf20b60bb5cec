//! Decision service providers for relgate.
//!
//! All providers implement the `relgate_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::{GEMINI_BASE_URL, OpenAiCompatProvider};
