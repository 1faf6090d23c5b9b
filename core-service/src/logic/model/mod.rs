//! Model Module - ML Inference
//!
//! The classifier is consumed through the `Classifier` trait;
//! `OnnxClassifier` is the production implementation.

pub mod inference;
pub mod checksum;
pub mod cancel;

// Re-export common types
pub use inference::{validate_probability, Classifier, InferenceError, OnnxClassifier};
pub use cancel::CancelToken;
pub use checksum::{sha256_file, verify_checksum};
