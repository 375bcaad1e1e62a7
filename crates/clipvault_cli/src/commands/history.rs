//! History commands: add, list, search, delete, pin, unpin, undo, copy.

use super::{execute, open};
use crate::clipboard::SystemClipboard;
use crate::Format;
use anyhow::{Context, Result};
use clipvault_core::{ClipboardAccess, Command, HistoryEntry, Outcome};
use console::style;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

const PREVIEW_CHARS: usize = 60;

/// One entry in `--format json` output.
#[derive(Serialize)]
struct EntryRow<'a> {
    index: usize,
    #[serde(flatten)]
    entry: &'a HistoryEntry,
}

/// Add text (or stdin) as the newest entry.
pub fn add(dir: &Path, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let vault = open(dir)?;
    vault.control().execute(Command::Add(text))?;
    println!("{} Added entry 0", style("✓").green());
    Ok(())
}

/// List entries, optionally only pinned ones.
pub fn list(dir: &Path, pinned_only: bool, limit: Option<usize>, format: Format) -> Result<()> {
    let vault = open(dir)?;
    let Outcome::Entries(entries) = vault.control().execute(Command::List)? else {
        anyhow::bail!("Unexpected outcome for list");
    };

    let mut indexed: Vec<(usize, HistoryEntry)> = entries
        .into_iter()
        .enumerate()
        .filter(|(_, e)| !pinned_only || e.pinned)
        .collect();
    if let Some(limit) = limit {
        indexed.truncate(limit);
    }

    print_entries(&indexed, format)
}

/// Case-insensitive search.
pub fn search(dir: &Path, keyword: &str, format: Format) -> Result<()> {
    let vault = open(dir)?;
    // Indexed so hits can be passed straight to pin/delete.
    let hits = vault.history().search_indexed(keyword)?;
    print_entries(&hits, format)
}

pub fn delete(dir: &Path, index: i64) -> Result<()> {
    let vault = open(dir)?;
    execute(&vault, Command::Delete(index), || no_entry(index))?;
    println!(
        "{} Deleted entry {} ({} to restore)",
        style("✓").green(),
        index,
        style("clipvault undo").cyan()
    );
    Ok(())
}

pub fn pin(dir: &Path, index: i64) -> Result<()> {
    let vault = open(dir)?;
    execute(&vault, Command::Pin(index), || no_entry(index))?;
    println!("{} Pinned entry {}", style("✓").green(), index);
    Ok(())
}

pub fn unpin(dir: &Path, index: i64) -> Result<()> {
    let vault = open(dir)?;
    execute(&vault, Command::Unpin(index), || no_entry(index))?;
    println!("{} Unpinned entry {}", style("✓").green(), index);
    Ok(())
}

/// Restore the last deleted entry at index 0.
pub fn undo(dir: &Path) -> Result<()> {
    let vault = open(dir)?;
    execute(&vault, Command::Undo, || "Nothing to undo".to_string())?;
    println!("{} Restored entry 0", style("✓").green());
    Ok(())
}

/// Put an entry on the system clipboard.
pub fn copy(dir: &Path, index: i64) -> Result<()> {
    let vault = open(dir)?;
    let entry = usize::try_from(index)
        .ok()
        .map(|i| vault.history().get(i))
        .transpose()?
        .flatten()
        .with_context(|| no_entry(index))?;

    SystemClipboard.write(&entry.content);
    println!(
        "{} Copied entry {}: {}",
        style("✓").green(),
        index,
        entry.preview(PREVIEW_CHARS)
    );
    Ok(())
}

fn no_entry(index: i64) -> String {
    format!("No history entry at index {}", index)
}

fn print_entries(entries: &[(usize, HistoryEntry)], format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let rows: Vec<EntryRow<'_>> = entries
                .iter()
                .map(|(index, entry)| EntryRow {
                    index: *index,
                    entry,
                })
                .collect();
            let out = serde_json::to_string_pretty(&rows).context("Failed to serialize to JSON")?;
            println!("{}", out);
        }
        Format::Text => {
            if entries.is_empty() {
                println!("{}", style("(no entries)").dim());
            }
            for (index, e) in entries {
                let pin = if e.pinned {
                    style("*").yellow().bold().to_string()
                } else {
                    " ".to_string()
                };
                println!(
                    "{:>4} {} {}  {}",
                    style(index).cyan(),
                    pin,
                    style(&e.timestamp).dim(),
                    e.preview(PREVIEW_CHARS)
                );
            }
        }
    }
    Ok(())
}
