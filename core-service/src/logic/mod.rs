//! Logic Module - Classification pipeline & its collaborators
//!
//! ## Architecture
//! - `validator` - Syntactic URL gate
//! - `features/` - Vocabulary + fixed-length encoding
//! - `model/` - Classifier trait, ONNX inference, checksum
//! - `threat/` - Verdict types and decision bands
//! - `explain/` - Best-effort natural-language explanation
//! - `telemetry/` - Result log
//! - `pipeline` - Orchestrates the stages per request

pub mod validator;
pub mod features;
pub mod model;
pub mod threat;
pub mod explain;
pub mod telemetry;
pub mod pipeline;
