//! Sequence Encoder
//!
//! URL string → fixed-length code sequence.
//! The model was trained on post-padded / post-truncated input, so padding is
//! always appended on the right and truncation always drops the tail.

use serde::Serialize;

use crate::constants::PAD_CODE;
use super::vocab::Vocabulary;

/// Fixed-length encoded URL. Length never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSequence {
    codes: Vec<u32>,
}

impl EncodedSequence {
    /// Right-pad with `PAD_CODE` or keep the first `max_len` codes.
    pub fn from_codes(mut codes: Vec<u32>, max_len: usize) -> Self {
        codes.truncate(max_len);
        codes.resize(max_len, PAD_CODE);
        Self { codes }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of codes before the padding tail
    pub fn content_len(&self) -> usize {
        self.codes
            .iter()
            .rposition(|&c| c != PAD_CODE)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Float view for the model input tensor
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.codes.iter().map(|&c| c as f32).collect()
    }
}

/// Encode `url` char by char, unknown chars → fallback code.
pub fn encode(url: &str, vocabulary: &Vocabulary, max_len: usize) -> EncodedSequence {
    let codes = url
        .chars()
        .take(max_len)
        .map(|ch| vocabulary.code_for(ch))
        .collect();

    EncodedSequence::from_codes(codes, max_len)
}
