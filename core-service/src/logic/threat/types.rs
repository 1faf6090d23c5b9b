//! Verdict Types
//!
//! Core types for URL classification.
//! No logic here - data structures only.

use serde::{Deserialize, Serialize};

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of the classification pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Probability below the benign band
    Benign,
    /// Probability above the malicious band
    Malicious,
    /// Probability too close to the boundary to call
    Uncertain,
    /// Rejected by the syntactic gate, never scored
    #[serde(rename = "Invalid Input")]
    InvalidInput,
}

impl Verdict {
    /// Label used in responses and in the result log
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Benign => "Benign",
            Verdict::Malicious => "Malicious",
            Verdict::Uncertain => "Uncertain",
            Verdict::InvalidInput => "Invalid Input",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Benign" => Some(Verdict::Benign),
            "Malicious" => Some(Verdict::Malicious),
            "Uncertain" => Some(Verdict::Uncertain),
            "Invalid Input" => Some(Verdict::InvalidInput),
            _ => None,
        }
    }

    /// Only a Malicious verdict warrants blocking the URL
    pub fn is_actionable(&self) -> bool {
        matches!(self, Verdict::Malicious)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Per-request result, handed to the recorder and the response path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub url: String,
    #[serde(rename = "prediction")]
    pub verdict: Verdict,
    /// Model probability; 0.0 for invalid input
    pub confidence: f32,
    pub explanation: String,
}

impl ClassificationResult {
    pub fn invalid_input(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            verdict: Verdict::InvalidInput,
            confidence: 0.0,
            explanation: INVALID_INPUT_EXPLANATION.to_string(),
        }
    }
}

/// Fixed explanation returned for rejected input
pub const INVALID_INPUT_EXPLANATION: &str =
    "The input does not appear to be a valid URL. Please enter a proper URL like https://example.com.";
