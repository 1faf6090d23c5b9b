//! URL Guard Core
//!
//! Classifies a URL as Benign, Uncertain or Malicious with a character-level
//! sequence model, then asks a text-generation service to explain the verdict.
//!
//! ```text
//! url ─► validator ─┬─► Invalid Input (terminal, not recorded)
//!                   └─► encoder ─► classifier ─► decision bands ─► explanation ─► recorder
//! ```
//!
//! Logs through the [`log`] facade; the embedding binary picks the backend.

pub mod constants;
pub mod logic;

pub use logic::explain::{DisabledExplainer, ExplanationService, GeminiClient, GeminiConfig};
pub use logic::features::{encode, EncodedSequence, Vocabulary};
pub use logic::model::{CancelToken, Classifier, InferenceError, OnnxClassifier};
pub use logic::pipeline::{Pipeline, PipelineConfig, PipelineError};
pub use logic::telemetry::{LoggedEntry, ResultRecorder, SqliteRecorder, StoredEntry};
pub use logic::threat::{classify, ClassificationResult, Verdict};
pub use logic::validator::is_valid;
