//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! The server reads overrides from the environment through the helpers below.

use std::time::Duration;

/// Fixed length of every encoded sequence fed to the model
pub const MAX_LEN: usize = 200;

/// Code used to right-pad short sequences
pub const PAD_CODE: u32 = 0;

/// Code emitted for characters missing from the vocabulary
pub const FALLBACK_CODE: u32 = 1;

/// Below this probability = Benign
pub const BENIGN_MAX: f32 = 0.35;

/// Above this probability = Malicious
pub const MALICIOUS_MIN: f32 = 0.65;

/// Default ONNX export of the CNN-LSTM model
pub const DEFAULT_MODEL_PATH: &str = "model/url_cnn_lstm.onnx";

/// Default character vocabulary
pub const DEFAULT_VOCAB_PATH: &str = "model/char_vocab.json";

/// Default text-generation model used for explanations
pub const DEFAULT_EXPLANATION_MODEL: &str = "gemini-2.5-flash";

/// Default text-generation API base
pub const DEFAULT_EXPLANATION_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default inference timeout (seconds)
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 10;

/// Default explanation timeout (seconds)
pub const DEFAULT_EXPLANATION_TIMEOUT_SECS: u64 = 20;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get expected model SHA-256 (hex) if one is configured
pub fn get_model_sha256() -> Option<String> {
    std::env::var("MODEL_SHA256")
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Get vocabulary path from environment or use default
pub fn get_vocab_path() -> String {
    std::env::var("VOCAB_PATH")
        .unwrap_or_else(|_| DEFAULT_VOCAB_PATH.to_string())
}

/// Get the explanation API key. Never defaulted.
pub fn get_explanation_api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get explanation model from environment or use default
pub fn get_explanation_model() -> String {
    std::env::var("GEMINI_MODEL")
        .unwrap_or_else(|_| DEFAULT_EXPLANATION_MODEL.to_string())
}

/// Get explanation API base from environment or use default
pub fn get_explanation_api_base() -> String {
    std::env::var("GEMINI_API_BASE")
        .unwrap_or_else(|_| DEFAULT_EXPLANATION_API_BASE.to_string())
}

/// Get inference timeout from environment or use default
pub fn get_inference_timeout() -> Duration {
    let secs = std::env::var("INFERENCE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Get explanation timeout from environment or use default
pub fn get_explanation_timeout() -> Duration {
    let secs = std::env::var("EXPLANATION_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EXPLANATION_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
