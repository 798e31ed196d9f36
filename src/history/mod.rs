use crate::models::{Action, Recommendation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many analyses the log keeps by default
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// One completed analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: f64,
    pub short_term_rsi: f64,
    pub long_term_rsi: f64,
    pub recommendation: Recommendation,
}

impl LogEntry {
    pub fn action(&self) -> Action {
        self.recommendation.action
    }
}

/// Rolling log of recent analyses, newest first
///
/// Owned by the caller and threaded through each run; nothing in the
/// crate keeps one globally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl SignalLog {
    /// Create an empty log
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries to keep (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an entry at the front
    ///
    /// If the log is full, drops the oldest entry
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);

        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries whose action warrants an alert, newest first
    pub fn actionable(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.action().is_actionable())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SignalLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
