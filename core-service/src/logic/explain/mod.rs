//! Explanation Module
//!
//! Best-effort natural-language rationale for a verdict.
//! The verdict is the deliverable; any failure here degrades to a placeholder
//! string and never fails the request.
//!
//! Output is not deterministic: the same inputs can produce different text.
//!
//! ## Structure
//! - `prompt.rs` - Prompt construction
//! - `client.rs` - Gemini HTTP client

pub mod prompt;
pub mod client;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::logic::threat::Verdict;

pub use client::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;

/// Every degraded explanation starts with this marker
pub const EXPLANATION_ERROR_PREFIX: &str = "Explanation service error:";

#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error("explanation service not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {0} ms")]
    Timeout(u128),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("empty response")]
    EmptyResponse,
}

/// External text-generation capability
#[async_trait]
pub trait ExplanationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ExplanationError>;

    fn name(&self) -> &str;
}

/// Stand-in used when no API key is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledExplainer;

#[async_trait]
impl ExplanationService for DisabledExplainer {
    async fn generate(&self, _prompt: &str) -> Result<String, ExplanationError> {
        Err(ExplanationError::NotConfigured)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Placeholder text shown in place of an explanation
pub fn placeholder(err: &ExplanationError) -> String {
    format!("{} {}", EXPLANATION_ERROR_PREFIX, err)
}

pub fn is_placeholder(text: &str) -> bool {
    text.starts_with(EXPLANATION_ERROR_PREFIX)
}

/// Ask `service` to explain the verdict. Always returns a non-empty string.
pub async fn explain(
    service: &dyn ExplanationService,
    url: &str,
    verdict: Verdict,
    probability: f32,
    timeout: Duration,
) -> String {
    let prompt = build_prompt(url, verdict, probability);

    let outcome = match tokio::time::timeout(timeout, service.generate(&prompt)).await {
        Ok(Ok(text)) if text.trim().is_empty() => Err(ExplanationError::EmptyResponse),
        Ok(result) => result,
        Err(_) => Err(ExplanationError::Timeout(timeout.as_millis())),
    };

    match outcome {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Explanation via {} failed: {}", service.name(), e);
            placeholder(&e)
        }
    }
}
