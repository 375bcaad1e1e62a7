//! Persistent clipboard history with pinning and single-level undo.

use crate::codec::{self, DecodeWarning};
use crate::error::{Result, VaultError};
use crate::storage::{self, FileLock};
use crate::types::HistoryEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

const HISTORY_FILE: &str = "history.cv";
const UNDO_FILE: &str = "last_deleted.cv";
const LOCK_FILE: &str = "history.lock";

/// Ordered clipboard history backed by a file.
///
/// Index 0 is always the newest entry. The file is authoritative: every
/// operation loads it, and every mutation rewrites it atomically, so several
/// handles (or processes) on the same directory see one history.
///
/// Mutations hold an exclusive lock for their whole read-modify-write cycle;
/// reads hold a shared lock. The lock is both in-process (`RwLock`) and
/// cross-process (advisory lock on `history.lock`).
///
/// # Examples
///
/// ```
/// use clipvault_core::HistoryStore;
/// use tempfile::TempDir;
///
/// let tmp = TempDir::new().unwrap();
/// let store = HistoryStore::open(tmp.path()).unwrap();
///
/// store.add_item("first").unwrap();
/// store.add_item("second").unwrap();
///
/// let entries = store.read_all().unwrap();
/// assert_eq!(entries[0].content, "second");
/// assert_eq!(entries[1].content, "first");
/// ```
pub struct HistoryStore {
    history_path: PathBuf,
    undo_path: PathBuf,
    lock_path: PathBuf,
    gate: RwLock<()>,
    /// Maximum number of entries (None = unlimited).
    capacity: Option<usize>,
    /// Time provider for testing (None = use system time).
    time_provider: Option<Arc<dyn Fn() -> i64 + Send + Sync>>,
}

struct ExclusiveAccess<'a> {
    _file: FileLock,
    _gate: RwLockWriteGuard<'a, ()>,
}

struct SharedAccess<'a> {
    _file: FileLock,
    _gate: RwLockReadGuard<'a, ()>,
}

impl HistoryStore {
    /// Opens (or creates) the history kept in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| VaultError::persistence(dir, e))?;
        Ok(Self::in_dir(dir))
    }

    /// Handle on a directory that already exists.
    pub(crate) fn in_dir(dir: &Path) -> Self {
        Self {
            history_path: dir.join(HISTORY_FILE),
            undo_path: dir.join(UNDO_FILE),
            lock_path: dir.join(LOCK_FILE),
            gate: RwLock::new(()),
            capacity: None,
            time_provider: None,
        }
    }

    /// Limits the history to `capacity` entries; `None` means unlimited.
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets a custom time provider (Unix seconds) for testing.
    pub fn with_time_provider(mut self, provider: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }

    pub(crate) fn with_shared_time_provider(
        mut self,
        provider: Option<Arc<dyn Fn() -> i64 + Send + Sync>>,
    ) -> Self {
        self.time_provider = provider;
        self
    }

    /// Path of the history file.
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Path of the undo record.
    pub fn undo_path(&self) -> &Path {
        &self.undo_path
    }

    /// Adds `content` as the newest entry and returns its index (always 0).
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `content` is empty.
    /// Returns `Persistence` if the history cannot be read or written.
    pub fn add_item(&self, content: &str) -> Result<usize> {
        if content.is_empty() {
            return Err(VaultError::InvalidInput(
                "cannot add empty content to history".to_string(),
            ));
        }

        let _access = self.exclusive()?;
        let mut entries = self.load_entries()?;

        let timestamp = self.next_timestamp(&entries);
        entries.insert(0, HistoryEntry::new(timestamp, content));
        let evicted = self.enforce_capacity(&mut entries);

        self.save_entries(&entries)?;
        debug!(len = entries.len(), evicted, "added history entry");
        Ok(0)
    }

    /// Deletes the entry at `index`, keeping it in the undo buffer.
    ///
    /// Returns `Ok(false)` if `index` is out of range. The undo buffer holds
    /// only the latest deletion. If the history write fails, the previous
    /// undo record is put back.
    pub fn delete_item(&self, index: usize) -> Result<bool> {
        let _access = self.exclusive()?;
        let mut entries = self.load_entries()?;

        if index >= entries.len() {
            return Ok(false);
        }

        let removed = entries.remove(index);

        // Undo record first: a crash between the writes leaves a duplicate, never a loss.
        let previous_undo = storage::read_optional(&self.undo_path)?;
        storage::atomic_write(&self.undo_path, &codec::encode_entry(&removed))?;
        if let Err(e) = self.save_entries(&entries) {
            self.restore_undo(previous_undo);
            return Err(e);
        }

        debug!(index, len = entries.len(), "deleted history entry");
        Ok(true)
    }

    /// Pins the entry at `index`. Returns `Ok(false)` if out of range.
    pub fn pin_item(&self, index: usize) -> Result<bool> {
        self.set_pinned(index, true)
    }

    /// Unpins the entry at `index`. Returns `Ok(false)` if out of range.
    pub fn unpin_item(&self, index: usize) -> Result<bool> {
        self.set_pinned(index, false)
    }

    /// Restores the most recently deleted entry at index 0.
    ///
    /// Returns `Ok(false)` if there is nothing to undo. The undo record is
    /// removed once the entry is back in the history.
    pub fn undo_delete(&self) -> Result<bool> {
        let _access = self.exclusive()?;

        let Some(entry) = self.load_undo()? else {
            return Ok(false);
        };

        let mut entries = self.load_entries()?;
        entries.insert(0, entry);
        self.save_entries(&entries)?;
        storage::remove_if_exists(&self.undo_path)?;

        debug!(len = entries.len(), "restored deleted entry");
        Ok(true)
    }

    /// Returns entries whose content contains `keyword`, ignoring case.
    ///
    /// Order is preserved. An empty keyword returns the whole history.
    pub fn search(&self, keyword: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .search_indexed(keyword)?
            .into_iter()
            .map(|(_, e)| e)
            .collect())
    }

    /// Like [`search`](Self::search), but keeps each hit's current index.
    pub fn search_indexed(&self, keyword: &str) -> Result<Vec<(usize, HistoryEntry)>> {
        let needle = keyword.to_lowercase();
        Ok(self
            .read_all()?
            .into_iter()
            .enumerate()
            .filter(|(_, e)| needle.is_empty() || e.matches(&needle))
            .collect())
    }

    /// Returns a snapshot of the whole history, newest first.
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        let _access = self.shared()?;
        self.load_entries()
    }

    /// Returns the entry at `index`, if any.
    pub fn get(&self, index: usize) -> Result<Option<HistoryEntry>> {
        Ok(self.read_all()?.into_iter().nth(index))
    }

    /// Returns the pinned entries with their current indices.
    pub fn pinned(&self) -> Result<Vec<(usize, HistoryEntry)>> {
        Ok(self
            .read_all()?
            .into_iter()
            .enumerate()
            .filter(|(_, e)| e.pinned)
            .collect())
    }

    /// Returns at most `limit` of the newest entries.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Returns the entry `undo_delete` would restore, without restoring it.
    pub fn last_deleted(&self) -> Result<Option<HistoryEntry>> {
        let _access = self.shared()?;
        self.load_undo()
    }

    /// Number of entries in the history.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Returns true if the history is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn set_pinned(&self, index: usize, pinned: bool) -> Result<bool> {
        let _access = self.exclusive()?;
        let mut entries = self.load_entries()?;

        let Some(entry) = entries.get_mut(index) else {
            return Ok(false);
        };
        entry.pinned = pinned;

        self.save_entries(&entries)?;
        debug!(index, pinned, "updated pin state");
        Ok(true)
    }

    fn exclusive(&self) -> Result<ExclusiveAccess<'_>> {
        // The gate guards no data, so a poisoned lock is still usable.
        let gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let file = FileLock::exclusive(&self.lock_path)?;
        Ok(ExclusiveAccess {
            _file: file,
            _gate: gate,
        })
    }

    fn shared(&self) -> Result<SharedAccess<'_>> {
        let gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let file = FileLock::shared(&self.lock_path)?;
        Ok(SharedAccess {
            _file: file,
            _gate: gate,
        })
    }

    fn load_entries(&self) -> Result<Vec<HistoryEntry>> {
        let Some(bytes) = storage::read_optional(&self.history_path)? else {
            return Ok(Vec::new());
        };
        let decoded = codec::decode_entries(&bytes);
        report_warnings(&self.history_path, &decoded.warnings);
        Ok(decoded.records)
    }

    fn save_entries(&self, entries: &[HistoryEntry]) -> Result<()> {
        storage::atomic_write(&self.history_path, &codec::encode_entries(entries))
    }

    fn load_undo(&self) -> Result<Option<HistoryEntry>> {
        let Some(bytes) = storage::read_optional(&self.undo_path)? else {
            return Ok(None);
        };
        let decoded = codec::decode_entry(&bytes);
        report_warnings(&self.undo_path, &decoded.warnings);
        Ok(decoded.records.into_iter().next())
    }

    /// Puts back the undo record a failed delete replaced.
    fn restore_undo(&self, previous: Option<Vec<u8>>) {
        let restored = match previous {
            Some(bytes) => storage::atomic_write(&self.undo_path, &bytes),
            None => storage::remove_if_exists(&self.undo_path),
        };
        if let Err(e) = restored {
            warn!(path = %self.undo_path.display(), error = %e, "could not restore undo record");
        }
    }

    fn now(&self) -> i64 {
        match self.time_provider {
            Some(ref provider) => provider(),
            None => Utc::now().timestamp(),
        }
    }

    /// Current time, never earlier than any timestamp already stored.
    fn next_timestamp(&self, entries: &[HistoryEntry]) -> String {
        let now = format_timestamp(self.now());
        match entries.iter().map(|e| e.timestamp.as_str()).max() {
            Some(latest) if latest > now.as_str() => latest.to_string(),
            _ => now,
        }
    }

    /// Evicts the oldest unpinned entries beyond capacity. Returns how many.
    ///
    /// The newest entry (index 0) is never evicted.
    fn enforce_capacity(&self, entries: &mut Vec<HistoryEntry>) -> usize {
        let Some(capacity) = self.capacity else {
            return 0;
        };

        let mut evicted = 0;
        while entries.len() > capacity.max(1) {
            match entries.iter().skip(1).rposition(|e| !e.pinned) {
                Some(i) => {
                    entries.remove(i + 1);
                    evicted += 1;
                }
                // Everything left is pinned
                None => break,
            }
        }
        evicted
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn report_warnings(path: &Path, warnings: &[DecodeWarning]) {
    for warning in warnings {
        warn!(
            path = %path.display(),
            offset = warning.offset,
            "skipping malformed record: {}",
            warning.reason
        );
    }
}
