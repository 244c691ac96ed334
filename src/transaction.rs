//! Audit trail entries recorded by accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One line of an account's append-only transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Human-readable description of the event
    pub description: String,

    /// UTC time at which the entry was appended
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(description: impl Into<String>) -> Self {
        LogEntry {
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    /// Case-insensitive substring match on the rendered entry, description
    /// and timestamp alike.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.to_string().to_lowercase().contains(needle)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}",
            self.description,
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
