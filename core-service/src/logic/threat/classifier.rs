//! Decision Policy
//!
//! Probability → verdict. Pure, stateless.
//! Never produces `InvalidInput`; that comes only from the validator gate.

use super::rules::ClassificationThresholds;
use super::types::Verdict;

/// Classify with the default 0.35 / 0.65 bands
pub fn classify(probability: f32) -> Verdict {
    classify_with_thresholds(probability, &ClassificationThresholds::default())
}

/// Classification with custom bands
pub fn classify_with_thresholds(probability: f32, thresholds: &ClassificationThresholds) -> Verdict {
    if probability < thresholds.benign_max {
        Verdict::Benign
    } else if probability <= thresholds.malicious_min {
        Verdict::Uncertain
    } else {
        Verdict::Malicious
    }
}
