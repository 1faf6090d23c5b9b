//! Data models

pub mod prediction;
pub mod history;

pub use prediction::*;
pub use history::*;
