//! Result log listing

use serde::{Deserialize, Serialize};

use urlguard_core::StoredEntry;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Deserialize, Default)]
pub struct HistoryFilter {
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: u64,
    pub entries: Vec<StoredEntry>,
}
