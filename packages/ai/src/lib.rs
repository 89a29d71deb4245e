#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text-generation glue for the greening map.
//!
//! Wraps `OpenAI` and Anthropic behind a single [`providers::LlmProvider`]
//! trait and builds the three generator-backed features on top of it:
//! site detection, plant recommendations and community proposals.
//!
//! Generator output is untrusted. Detected sites are validated before they
//! become [`green_map_site_models::CandidateSite`]s, and detection and
//! proposals fall back to deterministic, locally built results whenever the
//! generator is missing, fails, or returns something unusable.

pub mod detection;
pub mod proposal;
pub mod providers;
pub mod recommendations;

use thiserror::Error;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// A request was missing required fields or had malformed values.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },

    /// The generator produced nothing usable.
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Description of what went wrong.
        message: String,
    },
}

impl AiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }
}

/// Splits generated text into paragraphs separated by blank lines.
///
/// Each paragraph is trimmed; runs of blank lines never produce empty
/// paragraphs.
pub(crate) fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current.join("\n").trim().to_string());
    }

    sections
}

/// Returns the section at `index`, or `default` if it is missing.
pub(crate) fn section_or(sections: &[String], index: usize, default: &str) -> String {
    sections
        .get(index)
        .filter(|s| !s.is_empty())
        .map_or_else(|| default.to_string(), Clone::clone)
}
