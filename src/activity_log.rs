//! Operator-visible activity log
//!
//! Append-only, timestamped, cleared only on request. One call to [`ActivityLog::append`]
//! is one entry, so a multi-line block from a single action is never split by another
//! action's output.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub text: String,
}

impl LogEntry {
    /// `[HH:MM:SS] text`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Leading/trailing whitespace is dropped; blank text is ignored.
    pub fn append(&self, text: impl AsRef<str>) {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return;
        }
        tracing::info!(category = "ACTIVITY", "{}", text);
        let entry = LogEntry {
            timestamp: Local::now(),
            text: text.to_string(),
        };
        self.entries.lock().push(entry);
    }

    /// Append several lines as a single entry.
    pub fn append_block<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let block = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        self.append(block);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        tracing::info!(category = "ACTIVITY", "Activity log cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// All entries rendered and joined with newlines
    pub fn render(&self) -> String {
        self.entries
            .lock()
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
