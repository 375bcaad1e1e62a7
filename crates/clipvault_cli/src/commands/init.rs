//! Initialize a clipvault data directory.

use anyhow::{Context, Result};
use clipvault_core::Vault;
use console::style;
use std::path::Path;

/// Create the data directory and a default config.
pub fn run(dir: &Path) -> Result<()> {
    let vault = Vault::init(dir).context("Failed to initialize vault")?;

    println!(
        "{} Initialized clipvault in {}",
        style("✓").green(),
        vault.root().display()
    );
    println!();
    println!("  config.toml      - Poll interval and history limit");
    println!("  history.cv       - Clipboard history, newest first");
    println!("  last_deleted.cv  - Undo buffer for the last delete");
    println!("  slots/           - Quick-paste slots 0-9");
    println!();
    println!(
        "Poll interval: {} ms",
        vault.config().monitor.poll_interval_ms
    );

    Ok(())
}
