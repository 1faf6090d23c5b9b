//! Telemetry Module
//!
//! Result log for scored URLs.
//!
//! ## Structure
//! - `event.rs` - LoggedEntry (url, verdict label, timestamp)
//! - `recorder.rs` - ResultRecorder trait + SQLite implementation

pub mod event;
pub mod recorder;

pub use event::{LoggedEntry, StoredEntry};

pub use recorder::{RecorderError, ResultRecorder, SqliteRecorder};
