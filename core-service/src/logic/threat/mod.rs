//! Threat Module
//!
//! Maps the model probability to Benign / Uncertain / Malicious.
//! The middle band surfaces scores near the decision boundary instead of
//! forcing a guess.
//!
//! ## Structure
//! - `types`: Verdict and ClassificationResult
//! - `rules`: Band thresholds
//! - `classifier`: Decision logic
//!
//! ## Usage
//! ```ignore
//! use urlguard_core::logic::threat::{classify, Verdict};
//!
//! match classify(0.72) {
//!     Verdict::Benign => println!("Safe"),
//!     Verdict::Uncertain => println!("Review"),
//!     Verdict::Malicious => println!("Block"),
//!     Verdict::InvalidInput => unreachable!(),
//! }
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

pub use types::{ClassificationResult, Verdict, INVALID_INPUT_EXPLANATION};

pub use rules::{ClassificationThresholds, ThresholdError};

pub use classifier::{classify, classify_with_thresholds};
