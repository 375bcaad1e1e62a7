//! Command dispatch onto the History and Slot stores.

use crate::error::Result;
use crate::history::HistoryStore;
use crate::slots::SlotStore;
use crate::types::HistoryEntry;
use std::sync::Arc;

/// A request from an outer surface (CLI, editor binding, hotkey).
///
/// Indices are signed so callers can pass user input through unchanged;
/// negative values are treated as not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add text as the newest entry.
    Add(String),
    /// Delete the entry at an index, keeping it for undo.
    Delete(i64),
    /// Pin the entry at an index.
    Pin(i64),
    /// Unpin the entry at an index.
    Unpin(i64),
    /// Restore the last deleted entry.
    Undo,
    /// Every entry, newest first.
    List,
    /// Entries containing a keyword, ignoring case.
    Search(String),
    /// Store text in a slot.
    SetSlot(i64, String),
    /// Read a slot.
    GetSlot(i64),
}

/// Result of a successfully dispatched [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Entry added at this index (always 0).
    Added(usize),
    /// Whether the targeted entry or slot existed and was changed.
    Applied(bool),
    /// Entries in history order.
    Entries(Vec<HistoryEntry>),
    /// Slot contents, `None` when empty or out of range.
    Slot(Option<String>),
}

impl Outcome {
    /// Whether the command found what it targeted.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Added(_) | Outcome::Entries(_) => true,
            Outcome::Applied(applied) => *applied,
            Outcome::Slot(content) => content.is_some(),
        }
    }
}

/// Thin dispatcher from [`Command`] to store operations.
#[derive(Clone)]
pub struct ControlSurface {
    history: Arc<HistoryStore>,
    slots: Arc<SlotStore>,
}

impl ControlSurface {
    /// Creates a dispatcher over shared store handles.
    pub fn new(history: Arc<HistoryStore>, slots: Arc<SlotStore>) -> Self {
        Self { history, slots }
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty `Add`, `Persistence` on disk failures.
    /// Missing entries and slots are reported through the [`Outcome`].
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::Add(text) => Outcome::Added(self.history.add_item(&text)?),
            Command::Delete(index) => self.apply(index, |i| self.history.delete_item(i))?,
            Command::Pin(index) => self.apply(index, |i| self.history.pin_item(i))?,
            Command::Unpin(index) => self.apply(index, |i| self.history.unpin_item(i))?,
            Command::Undo => Outcome::Applied(self.history.undo_delete()?),
            Command::List => Outcome::Entries(self.history.read_all()?),
            Command::Search(keyword) => Outcome::Entries(self.history.search(&keyword)?),
            Command::SetSlot(slot, text) => {
                self.apply(slot, |i| self.slots.set_slot(i, &text))?
            }
            Command::GetSlot(slot) => match to_index(slot) {
                Some(i) => Outcome::Slot(self.slots.get_slot(i)?),
                None => Outcome::Slot(None),
            },
        };
        Ok(outcome)
    }

    fn apply(&self, index: i64, op: impl FnOnce(usize) -> Result<bool>) -> Result<Outcome> {
        match to_index(index) {
            Some(i) => Ok(Outcome::Applied(op(i)?)),
            None => Ok(Outcome::Applied(false)),
        }
    }
}

fn to_index(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}
