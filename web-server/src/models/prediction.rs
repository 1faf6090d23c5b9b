//! Prediction request/response

use serde::{Deserialize, Serialize};

use urlguard_core::ClassificationResult;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub url: String,
    pub prediction: String,
    pub confidence: f32,
    pub explanation: String,
}

impl From<ClassificationResult> for PredictResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            prediction: result.verdict.as_str().to_string(),
            url: result.url,
            confidence: result.confidence,
            explanation: result.explanation,
        }
    }
}
