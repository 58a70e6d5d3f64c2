//! Per-function invocation log store.
//!
//! The log store is a client-visible data structure, not process diagnostics:
//! the invoker appends entries around every execution and clients read them
//! back with [`LogStore::get_logs`]. Sequences are append-only and insertion
//! order is authoritative; the timestamp on each entry is informational.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Default number of entries returned when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// One timestamped message in a function's log sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// The recorded message.
    pub message: String,
}

impl LogEntry {
    fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

/// Append-only store of per-function log sequences.
///
/// Sequences are created on first append and survive deregistration of the
/// function they belong to, so invocation history remains auditable.
#[derive(Default)]
pub struct LogStore {
    entries: RwLock<HashMap<String, Vec<LogEntry>>>,
}

impl LogStore {
    /// Create an empty log store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a function's log sequence.
    pub async fn append(&self, name: &str, message: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries
            .entry(name.to_string())
            .or_default()
            .push(LogEntry::new(message));
    }

    /// Fetch at most `limit` entries (default 100) from the **start** of the
    /// stored sequence, oldest first.
    ///
    /// Returns an empty sequence for names with no recorded logs, whether or
    /// not they are registered anywhere.
    pub async fn get_logs(&self, name: &str, limit: Option<usize>) -> Vec<LogEntry> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT);
        let entries = self.entries.read().await;
        entries
            .get(name)
            .map(|seq| seq.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of entries recorded for a function.
    pub async fn count(&self, name: &str) -> usize {
        let entries = self.entries.read().await;
        entries.get(name).map(Vec::len).unwrap_or(0)
    }
}
