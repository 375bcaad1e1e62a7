//! Data directory handle tying the stores, monitor and config together.

use crate::config::{Config, CONFIG_FILE};
use crate::control::ControlSurface;
use crate::error::{Result, VaultError};
use crate::history::HistoryStore;
use crate::monitor::{ChangeMonitor, ClipboardAccess};
use crate::slots::SlotStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SLOTS_DIR: &str = "slots";

type TimeProvider = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Clipvault data directory handle.
///
/// Layout:
///
/// ```text
/// <root>/
///   config.toml
///   history.cv
///   last_deleted.cv
///   history.lock
///   slots/slot_<n>.cv
/// ```
pub struct Vault {
    /// Data directory.
    root: PathBuf,
    /// Loaded configuration.
    config: Config,
    history: Arc<HistoryStore>,
    slots: Arc<SlotStore>,
}

impl Vault {
    /// Opens the vault in `dir`, creating the directory if needed.
    ///
    /// A missing `config.toml` means default settings.
    ///
    /// # Errors
    ///
    /// Returns `Config` if `config.toml` is invalid, `Persistence` if the
    /// directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use clipvault_core::{Command, Outcome, Vault};
    /// use tempfile::TempDir;
    ///
    /// let tmp = TempDir::new().unwrap();
    /// let vault = Vault::open(tmp.path()).unwrap();
    ///
    /// let control = vault.control();
    /// control.execute(Command::Add("hello".into())).unwrap();
    /// assert_eq!(
    ///     control.execute(Command::GetSlot(0)).unwrap(),
    ///     Outcome::Slot(None)
    /// );
    /// ```
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| VaultError::persistence(&root, e))?;

        let config = Config::load(&root)?;
        let slots = Arc::new(SlotStore::open(root.join(SLOTS_DIR))?);
        let history = Arc::new(build_history(&root, &config, None));

        Ok(Self {
            root,
            config,
            history,
            slots,
        })
    }

    /// Creates a new vault in `dir` with a default `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if `dir` already holds a `config.toml`.
    pub fn init(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref();
        if root.join(CONFIG_FILE).exists() {
            return Err(VaultError::AlreadyInitialized(root.to_path_buf()));
        }

        fs::create_dir_all(root).map_err(|e| VaultError::persistence(root, e))?;
        Config::default().save(root)?;
        Self::open(root)
    }

    /// Sets a custom time provider (Unix seconds) for testing.
    ///
    /// Applies to the history handle returned by later `history()` calls.
    pub fn with_time_provider(mut self, provider: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        let provider: TimeProvider = Arc::new(provider);
        self.history = Arc::new(build_history(&self.root, &self.config, Some(provider)));
        self
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared history handle.
    pub fn history(&self) -> Arc<HistoryStore> {
        Arc::clone(&self.history)
    }

    /// Shared slot handle.
    pub fn slots(&self) -> Arc<SlotStore> {
        Arc::clone(&self.slots)
    }

    /// Command dispatcher over this vault's stores.
    pub fn control(&self) -> ControlSurface {
        ControlSurface::new(self.history(), self.slots())
    }

    /// Idle monitor polling `clipboard` at the configured interval.
    pub fn monitor(&self, clipboard: Arc<dyn ClipboardAccess>) -> ChangeMonitor {
        ChangeMonitor::new(clipboard, self.config.monitor.poll_interval())
    }
}

fn build_history(root: &Path, config: &Config, provider: Option<TimeProvider>) -> HistoryStore {
    HistoryStore::in_dir(root)
        .with_capacity(config.history.capacity())
        .with_shared_time_provider(provider)
}
