//! Logged Entry
//!
//! One row of the result log: what was asked, what was decided, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::threat::{ClassificationResult, Verdict};

/// Append-only record of a scored URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEntry {
    pub url: String,
    /// Verdict label, e.g. "Malicious"
    pub prediction: String,
    pub timestamp: DateTime<Utc>,
}

impl LoggedEntry {
    pub fn new(url: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            url: url.into(),
            prediction: verdict.as_str().to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_result(result: &ClassificationResult) -> Self {
        Self::new(result.url.clone(), result.verdict)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        Verdict::from_label(&self.prediction)
    }
}

/// Entry as read back from storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: i64,
    #[serde(flatten)]
    pub entry: LoggedEntry,
}
