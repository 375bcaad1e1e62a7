//! Clipvault Core Library
//!
//! A clipboard history manager, providing:
//! - Durable, ordered clipboard history with pinning and single-level undo
//! - Ten independent quick-paste slots
//! - A background clipboard change monitor
//! - A command dispatcher for outer surfaces (CLI, editor bindings, hotkeys)
//!
//! # Quick Start
//!
//! ```
//! use clipvault_core::HistoryStore;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let store = HistoryStore::open(tmp.path()).unwrap();
//!
//! store.add_item("hello world").unwrap();
//! assert_eq!(store.read_all().unwrap()[0].content, "hello world");
//! ```
//!
//! # Features
//!
//! ## Pinning and Undo
//!
//! Entries are addressed by position, newest first. Deleting an entry keeps
//! it in a one-slot undo buffer until the next delete:
//!
//! ```
//! use clipvault_core::HistoryStore;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let store = HistoryStore::open(tmp.path()).unwrap();
//! store.add_item("keep me").unwrap();
//!
//! assert!(store.pin_item(0).unwrap());
//! assert!(store.delete_item(0).unwrap());
//! assert!(store.undo_delete().unwrap());
//!
//! let entry = &store.read_all().unwrap()[0];
//! assert_eq!(entry.content, "keep me");
//! assert!(entry.pinned);
//! ```
//!
//! ## Quick-Paste Slots
//!
//! ```
//! use clipvault_core::SlotStore;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let slots = SlotStore::open(tmp.path()).unwrap();
//!
//! slots.set_slot(3, "signature").unwrap();
//! assert_eq!(slots.get_slot(3).unwrap().as_deref(), Some("signature"));
//! assert_eq!(slots.get_slot(4).unwrap(), None);
//! ```
//!
//! ## Storage Format
//!
//! Records are length-framed text, so any content round-trips exactly:
//!
//! ```
//! use clipvault_core::{decode_entries, encode_entries, HistoryEntry};
//!
//! let entries = vec![HistoryEntry::new("2025-01-01T00:00:00Z", "line one\n@entry 3 0 x")];
//! let decoded = decode_entries(&encode_entries(&entries));
//!
//! assert!(decoded.warnings.is_empty());
//! assert_eq!(decoded.records, entries);
//! ```

pub mod codec;
pub mod config;
pub mod control;
pub mod error;
pub mod history;
pub mod monitor;
pub mod slots;
mod storage;
pub mod types;
pub mod vault;

pub use codec::{
    decode_entries, decode_entry, decode_slot, encode_entries, encode_entry, encode_slot,
    DecodeWarning, Decoded,
};
pub use config::{Config, HistoryConfig, MonitorConfig};
pub use control::{Command, ControlSurface, Outcome};
pub use error::{Result, VaultError};
pub use history::HistoryStore;
pub use monitor::{ChangeDetector, ChangeMonitor, ClipboardAccess, MonitorState};
pub use slots::SlotStore;
pub use types::{HistoryEntry, Slot, SLOT_COUNT};
pub use vault::Vault;
