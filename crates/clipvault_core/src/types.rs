//! Core data types for clipboard history and quick-paste slots.

use serde::{Deserialize, Serialize};

/// Number of quick-paste slots (addressed `0..SLOT_COUNT`).
pub const SLOT_COUNT: usize = 10;

/// One captured piece of clipboard text.
///
/// Entries are addressed by their position in the history: index 0 is the
/// newest entry, and indices shift when an earlier entry is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time (RFC 3339, UTC), assigned by the store.
    pub timestamp: String,
    /// Copied text. Never empty for entries created by the store.
    pub content: String,
    /// Whether the user pinned this entry.
    pub pinned: bool,
}

impl HistoryEntry {
    /// Creates an unpinned entry.
    pub fn new(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            content: content.into(),
            pinned: false,
        }
    }

    /// Returns the first line of the content, shortened to `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("");
        let multiline = self.content.contains('\n');
        if first_line.chars().count() <= max_chars {
            if multiline {
                format!("{first_line} ...")
            } else {
                first_line.to_string()
            }
        } else {
            let cut: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }

    /// Case-insensitive substring match against the content.
    pub fn matches(&self, keyword_lower: &str) -> bool {
        self.content.to_lowercase().contains(keyword_lower)
    }
}

/// A quick-paste slot and its stored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot index in `0..SLOT_COUNT`.
    pub index: usize,
    /// Stored text (may be empty).
    pub content: String,
}
