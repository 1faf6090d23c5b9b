//! Result Recorder
//!
//! Append-only log of scored URLs.
//! `SqliteRecorder` keeps one connection behind a mutex; inserts are the only
//! writes, so concurrent requests simply serialize on the lock.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use thiserror::Error;

use super::event::{LoggedEntry, StoredEntry};

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Persistence collaborator. Blocking; callers move it to a blocking thread.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, entry: &LoggedEntry) -> Result<(), RecorderError>;
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS url_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url VARCHAR(500) NOT NULL,
    prediction VARCHAR(50) NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_url_log_timestamp ON url_log(timestamp);
"#;

pub struct SqliteRecorder {
    conn: Mutex<Connection>,
}

impl SqliteRecorder {
    /// Open (or create) the database file and apply the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Self::init(conn, &path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self, RecorderError> {
        Self::init(Connection::open_in_memory()?, ":memory:")
    }

    fn init(conn: Connection, location: &str) -> Result<Self, RecorderError> {
        conn.execute_batch(SCHEMA_SQL)?;
        log::info!("Result log ready: {}", location);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Total number of recorded entries
    pub fn count(&self) -> Result<u64, RecorderError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM url_log", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Most recent entries, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredEntry>, RecorderError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, url, prediction, timestamp FROM url_log ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let raw_ts: String = row.get(3)?;
            let timestamp = DateTime::parse_from_rfc3339(&raw_ts)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
                })?;

            Ok(StoredEntry {
                id: row.get(0)?,
                entry: LoggedEntry {
                    url: row.get(1)?,
                    prediction: row.get(2)?,
                    timestamp,
                },
            })
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl ResultRecorder for SqliteRecorder {
    fn record(&self, entry: &LoggedEntry) -> Result<(), RecorderError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO url_log (url, prediction, timestamp) VALUES (?1, ?2, ?3)",
            params![entry.url, entry.prediction, entry.timestamp.to_rfc3339()],
        )?;

        log::debug!("Recorded {} -> {}", entry.url, entry.prediction);
        Ok(())
    }
}
