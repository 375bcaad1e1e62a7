//! File helpers shared by the stores: atomic replace, optional reads, locks.

use crate::error::{Result, VaultError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes data atomically using temp file + fsync + rename.
///
/// Readers see either the old file or the new one, never a partial write.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VaultError::persistence(parent, e))?;
    }

    let tmp_path = tmp_path_for(path);

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(VaultError::persistence(path, e));
    }

    // fsync parent directory (Unix)
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            if let Ok(dir_file) = File::open(parent) {
                let _ = dir_file.sync_all();
            }
        }
    }

    Ok(())
}

/// Reads a file, treating a missing file as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(VaultError::persistence(path, e)),
    }
}

/// Removes a file. Does nothing if it doesn't exist.
pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(VaultError::persistence(path, e)),
    }
}

/// Unique sibling temp path, so concurrent writers never share one.
fn tmp_path_for(path: &Path) -> PathBuf {
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record");
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
}

/// RAII guard for an advisory lock on a lock file.
///
/// Serializes access across processes (e.g. the CLI and a running `watch`).
/// The lock is released when the guard is dropped.
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    /// Blocks until an exclusive lock is held.
    pub(crate) fn exclusive(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()
            .map_err(|e| VaultError::persistence(path, e))?;
        Ok(Self { file })
    }

    /// Blocks until a shared lock is held.
    pub(crate) fn shared(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_shared()
            .map_err(|e| VaultError::persistence(path, e))?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VaultError::persistence(parent, e))?;
    }
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| VaultError::persistence(path, e))
}
