//! Text-Generation API Client
//!
//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants;
use super::{ExplanationError, ExplanationService};

/// Longest error body kept in `ExplanationError::Http`
const MAX_ERROR_BODY: usize = 300;

/// Client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Defaults from the environment. `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = constants::get_explanation_api_key()?;

        Some(Self {
            api_base: constants::get_explanation_api_base(),
            model: constants::get_explanation_model(),
            api_key,
            timeout: constants::get_explanation_timeout(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt.to_string()) }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ExplanationError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplanationError::Network(e.to_string()))?;

        log::info!("Explanation client ready (model: {})", config.model);

        Ok(Self { config, http_client })
    }
}

#[async_trait]
impl ExplanationService for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ExplanationError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self.http_client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplanationError::Timeout(self.config.timeout.as_millis())
                } else {
                    ExplanationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            log::error!("Explanation request failed ({}): {}", status.as_u16(), body);
            return Err(ExplanationError::Http { status: status.as_u16(), body });
        }

        let parsed: GenerateContentResponse = response.json().await
            .map_err(|e| ExplanationError::Parse(e.to_string()))?;

        parsed.text().ok_or(ExplanationError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
