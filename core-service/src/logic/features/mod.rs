//! Features Module - URL → model input
//!
//! ## Structure
//! - `vocab.rs` - Character vocabulary (loaded once, read-only)
//! - `sequence.rs` - Fixed-length encoding (right pad / right truncate)

pub mod vocab;
pub mod sequence;

mod tests;

pub use vocab::{Vocabulary, VocabularyError};
pub use sequence::{encode, EncodedSequence};
