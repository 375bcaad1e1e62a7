//! Ten quick-paste slots, each persisted in its own file.

use crate::codec;
use crate::error::{Result, VaultError};
use crate::storage;
use crate::types::{Slot, SLOT_COUNT};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Quick-paste slots `0..SLOT_COUNT`.
///
/// Slots are independent: each has its own file (`slot_<n>.cv`) and its own
/// lock, so writing one slot never touches another.
pub struct SlotStore {
    dir: PathBuf,
    locks: [Mutex<()>; SLOT_COUNT],
}

impl SlotStore {
    /// Opens (or creates) the slot directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| VaultError::persistence(&dir, e))?;

        Ok(Self {
            dir,
            locks: std::array::from_fn(|_| Mutex::new(())),
        })
    }

    /// Path of the record backing `slot`.
    pub fn slot_path(&self, slot: usize) -> PathBuf {
        self.dir.join(format!("slot_{}.cv", slot))
    }

    /// Stores `content` in `slot`, replacing what was there.
    ///
    /// Returns `Ok(false)` if `slot` is out of range.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the slot file cannot be written.
    pub fn set_slot(&self, slot: usize, content: &str) -> Result<bool> {
        let Some(lock) = self.locks.get(slot) else {
            return Ok(false);
        };
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let record = Slot {
            index: slot,
            content: content.to_string(),
        };
        storage::atomic_write(&self.slot_path(slot), &codec::encode_slot(&record))?;

        debug!(slot, len = content.len(), "stored slot");
        Ok(true)
    }

    /// Returns the text in `slot`, or `None` if out of range or never set.
    ///
    /// A damaged slot file is logged and reported as empty.
    pub fn get_slot(&self, slot: usize) -> Result<Option<String>> {
        let Some(lock) = self.locks.get(slot) else {
            return Ok(None);
        };
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.slot_path(slot);
        let Some(bytes) = storage::read_optional(&path)? else {
            return Ok(None);
        };

        let decoded = codec::decode_slot(&bytes);
        for warning in &decoded.warnings {
            warn!(path = %path.display(), "damaged slot record: {}", warning);
        }

        match decoded.records.into_iter().next() {
            Some(record) if record.index == slot => Ok(Some(record.content)),
            Some(record) => {
                warn!(
                    path = %path.display(),
                    found = record.index,
                    "slot record belongs to another slot"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Returns every slot that holds a value, in index order.
    pub fn list_slots(&self) -> Result<Vec<Slot>> {
        let mut slots = Vec::new();
        for index in 0..SLOT_COUNT {
            if let Some(content) = self.get_slot(index)? {
                slots.push(Slot { index, content });
            }
        }
        Ok(slots)
    }
}
