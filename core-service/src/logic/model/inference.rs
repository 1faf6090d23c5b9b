//! Inference Engine - ONNX Runtime Integration
//!
//! Load and run the CNN-LSTM URL model.
//! Kept behind the `Classifier` trait so the pipeline never touches `ort`.

use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;
use parking_lot::Mutex;
use thiserror::Error;
use ort::session::{RunOptions, Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::constants::MAX_LEN;
use crate::logic::features::EncodedSequence;
use super::cancel::CancelToken;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Expected sequence of length {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Runtime(String),

    #[error("Model returned invalid probability: {0}")]
    InvalidOutput(f32),

    #[error("Inference timed out after {0} ms")]
    Timeout(u128),

    #[error("Inference cancelled")]
    Cancelled,

    #[error("Model checksum mismatch (expected {expected}, got {actual})")]
    ChecksumMismatch { expected: String, actual: String },
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Scores an encoded URL. Blocking; callers move it to a blocking thread.
pub trait Classifier: Send + Sync {
    /// Probability that the URL is malicious, in [0, 1]
    fn predict(&self, sequence: &EncodedSequence) -> Result<f32, InferenceError>;

    /// `predict` that gives up once `cancel` fires. The default only checks
    /// the token before starting; implementations that can interrupt a run
    /// in flight should override it.
    fn predict_cancellable(
        &self,
        sequence: &EncodedSequence,
        cancel: &CancelToken,
    ) -> Result<f32, InferenceError> {
        if cancel.is_cancelled() {
            return Err(InferenceError::Cancelled);
        }
        self.predict(sequence)
    }

    fn name(&self) -> &str;
}

/// Reject NaN, infinities and anything outside [0, 1]
pub fn validate_probability(score: f32) -> Result<f32, InferenceError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(InferenceError::InvalidOutput(score))
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// What the loaded graph expects and produces
#[derive(Debug, Clone)]
struct ModelShape {
    sequence_length: usize,
    output_name: String,
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxClassifier {
    session: Mutex<Session>,
    shape: ModelShape,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &str) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path);

        if !Path::new(model_path).exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Session(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Session(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Session(format!("Failed to load model: {}", e)))?;

        let classifier = Self::from_session(session)?;
        log::info!(
            "ONNX model loaded successfully (input: [1, {}], output: {})",
            classifier.shape.sequence_length,
            classifier.shape.output_name
        );
        Ok(classifier)
    }

    fn from_session(session: Session) -> Result<Self, InferenceError> {
        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Session("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            shape: ModelShape {
                sequence_length: MAX_LEN,
                output_name,
            },
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, sequence: &EncodedSequence) -> Result<f32, InferenceError> {
        self.predict_cancellable(sequence, &CancelToken::new())
    }

    /// Runs with its own `RunOptions`; cancelling the token terminates the run
    fn predict_cancellable(
        &self,
        sequence: &EncodedSequence,
        cancel: &CancelToken,
    ) -> Result<f32, InferenceError> {
        let start_time = std::time::Instant::now();

        let expected = self.shape.sequence_length;
        if sequence.len() != expected {
            return Err(InferenceError::Shape { expected, actual: sequence.len() });
        }

        let input_array = Array2::<f32>::from_shape_vec((1, expected), sequence.to_f32_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let run_options = Arc::new(
            RunOptions::new().map_err(|e| InferenceError::Session(format!("Run options error: {}", e)))?,
        );
        let terminator = Arc::clone(&run_options);
        cancel.on_cancel(move || {
            if let Err(e) = terminator.terminate() {
                log::warn!("Failed to terminate ONNX run: {}", e);
            }
        });

        // A run that timed out while queued on the lock never starts
        let mut session = self.session.lock();
        if cancel.is_cancelled() {
            return Err(InferenceError::Cancelled);
        }

        let outputs = session.run_with_options(ort::inputs![input_tensor], &*run_options)
            .map_err(|e| {
                if cancel.is_cancelled() {
                    InferenceError::Cancelled
                } else {
                    InferenceError::Runtime(e.to_string())
                }
            })?;

        let output = outputs.get(&self.shape.output_name)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let score = data.first()
            .copied()
            .ok_or_else(|| InferenceError::Runtime("Empty output tensor".to_string()))?;

        log::debug!(
            "ONNX inference: score={:.4} ({} us)",
            score,
            start_time.elapsed().as_micros()
        );

        validate_probability(score)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
