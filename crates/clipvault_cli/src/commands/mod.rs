//! CLI commands.

use anyhow::{Context, Result};
use clipvault_core::{Command, Outcome, Vault};
use std::path::{Path, PathBuf};

pub mod history;
pub mod init;
pub mod slot;
pub mod watch;

/// Resolves the data directory: flag or `CLIPVAULT_DIR`, then `$HOME/.clipvault`,
/// then `./.clipvault`.
pub fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".clipvault")))
        .unwrap_or_else(|| PathBuf::from(".clipvault"))
}

fn open(dir: &Path) -> Result<Vault> {
    Vault::open(dir).with_context(|| format!("Failed to open vault at {}", dir.display()))
}

/// Runs a command, turning a not-found outcome into an error.
fn execute(vault: &Vault, command: Command, not_found: impl FnOnce() -> String) -> Result<Outcome> {
    let outcome = vault.control().execute(command)?;
    if !outcome.is_success() {
        anyhow::bail!(not_found());
    }
    Ok(outcome)
}
