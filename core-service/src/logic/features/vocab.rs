//! Character Vocabulary
//!
//! Immutable char → code table produced at training time.
//! Loaded once at startup and shared read-only between requests.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::constants::{FALLBACK_CODE, PAD_CODE};

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse vocabulary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Negative code {code} for character {ch:?}")]
    NegativeCode { ch: char, code: i64 },

    #[error("Code {code} for character {ch:?} is out of range")]
    CodeOutOfRange { ch: char, code: i64 },

    #[error("Reserved code {code} assigned to character {ch:?}")]
    ReservedCode { ch: char, code: u32 },

    #[error("Vocabulary contains no single-character entries")]
    Empty,
}

/// Read-only character vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    codes: HashMap<char, u32>,
}

impl Vocabulary {
    /// Build from an already validated map.
    pub fn from_map(map: HashMap<char, u32>) -> Result<Self, VocabularyError> {
        for (&ch, &code) in &map {
            if code == PAD_CODE || code == FALLBACK_CODE {
                return Err(VocabularyError::ReservedCode { ch, code });
            }
        }
        if map.is_empty() {
            return Err(VocabularyError::Empty);
        }
        Ok(Self { codes: map })
    }

    /// Parse the `{ "<char>": <int> }` JSON written by the training job.
    ///
    /// Multi-character keys (tokenizer markers like `"<OOV>"`) are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let raw: HashMap<String, i64> = serde_json::from_str(json)?;
        let mut codes = HashMap::with_capacity(raw.len());

        for (key, code) in raw {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    log::warn!("Skipping non single-character vocabulary key {:?}", key);
                    continue;
                }
            };

            if code < 0 {
                return Err(VocabularyError::NegativeCode { ch, code });
            }
            let code = u32::try_from(code)
                .map_err(|_| VocabularyError::CodeOutOfRange { ch, code })?;

            codes.insert(ch, code);
        }

        Self::from_map(codes)
    }

    /// Load vocabulary from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        log::info!("Loading vocabulary from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let vocab = Self::from_json_str(&content)?;

        log::info!("Vocabulary loaded ({} characters)", vocab.len());
        Ok(vocab)
    }

    /// Code for `ch`, or the fallback code when unknown
    pub fn code_for(&self, ch: char) -> u32 {
        self.codes.get(&ch).copied().unwrap_or(FALLBACK_CODE)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
