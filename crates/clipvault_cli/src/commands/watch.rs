//! Record clipboard changes into the history.

use super::open;
use crate::clipboard::SystemClipboard;
use anyhow::{Context, Result};
use clipvault_core::ChangeMonitor;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Watch the clipboard until Enter (or EOF) on stdin.
pub fn run(dir: &std::path::Path, interval_ms: Option<u64>) -> Result<()> {
    let vault = open(dir)?;
    let history = vault.history();

    let mut monitor = match interval_ms {
        Some(0) => anyhow::bail!("--interval-ms must be greater than 0"),
        Some(ms) => ChangeMonitor::new(Arc::new(SystemClipboard), Duration::from_millis(ms)),
        None => vault.monitor(Arc::new(SystemClipboard)),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    pb.set_message(format!(
        "Watching clipboard every {} ms (press Enter to stop)",
        monitor.interval().as_millis()
    ));
    pb.enable_steady_tick(Duration::from_millis(120));

    monitor.start_recording(Arc::clone(&history));

    let mut line = String::new();
    let waited = std::io::stdin().read_line(&mut line);
    monitor.stop();
    pb.finish_and_clear();
    waited.context("Failed to read stdin")?;

    println!(
        "{} Stopped watching; history holds {} entries",
        style("✓").green(),
        history.len()?
    );
    Ok(())
}
