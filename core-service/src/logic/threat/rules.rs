//! Decision Thresholds
//!
//! Band limits for mapping a model probability to a verdict.
//! No classify logic here - constants and config only.
//!
//! Convention: the Uncertain band is closed on both ends,
//! `benign_max <= p <= malicious_min`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{BENIGN_MAX, MALICIOUS_MIN};

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("Threshold {0} is outside [0, 1]")]
    OutOfRange(f32),

    #[error("benign_max ({benign_max}) exceeds malicious_min ({malicious_min})")]
    Inverted { benign_max: f32, malicious_min: f32 },
}

/// Band limits (configurable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// Below this = Benign
    pub benign_max: f32,
    /// Above this = Malicious, between (inclusive) = Uncertain
    pub malicious_min: f32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            benign_max: BENIGN_MAX,
            malicious_min: MALICIOUS_MIN,
        }
    }
}

impl ClassificationThresholds {
    pub fn new(benign_max: f32, malicious_min: f32) -> Result<Self, ThresholdError> {
        let thresholds = Self { benign_max, malicious_min };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        for value in [self.benign_max, self.malicious_min] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThresholdError::OutOfRange(value));
            }
        }
        if self.benign_max > self.malicious_min {
            return Err(ThresholdError::Inverted {
                benign_max: self.benign_max,
                malicious_min: self.malicious_min,
            });
        }
        Ok(())
    }
}
