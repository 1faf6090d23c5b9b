//! Configuration module

use std::env;

use urlguard_core::constants;
use urlguard_core::{GeminiConfig, PipelineConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite result log
    pub database_path: String,

    /// ONNX model file
    pub model_path: String,

    /// Expected SHA-256 of the model file (hex)
    pub model_sha256: Option<String>,

    /// Character vocabulary JSON
    pub vocab_path: String,

    /// Explanation client; `None` when no API key is set
    pub gemini: Option<GeminiConfig>,

    /// Thresholds and timeouts
    pub pipeline: PipelineConfig,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "urls.db".to_string()),

            model_path: constants::get_model_path(),
            model_sha256: constants::get_model_sha256(),
            vocab_path: constants::get_vocab_path(),
            gemini: GeminiConfig::from_env(),
            pipeline: PipelineConfig::from_env(),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
