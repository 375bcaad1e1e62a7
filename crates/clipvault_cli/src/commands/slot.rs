//! Quick-paste slot commands.

use super::{execute, open};
use crate::clipboard::SystemClipboard;
use anyhow::{Context, Result};
use clipvault_core::{ClipboardAccess, Command, Outcome, SLOT_COUNT};
use console::style;
use std::path::Path;

pub fn set(dir: &Path, slot: i64, text: String) -> Result<()> {
    let vault = open(dir)?;
    execute(&vault, Command::SetSlot(slot, text), || out_of_range(slot))?;
    println!("{} Stored slot {}", style("✓").green(), slot);
    Ok(())
}

/// Print a slot's raw text.
pub fn get(dir: &Path, slot: i64) -> Result<()> {
    let text = read_slot(dir, slot)?;
    println!("{}", text);
    Ok(())
}

pub fn list(dir: &Path) -> Result<()> {
    let vault = open(dir)?;
    let slots = vault.slots().list_slots()?;

    if slots.is_empty() {
        println!("{}", style("(no slots set)").dim());
    }
    for slot in slots {
        let first_line = slot.content.lines().next().unwrap_or("");
        println!("{:>2}  {}", style(slot.index).cyan(), first_line);
    }
    Ok(())
}

/// Copy the current clipboard text into a slot.
pub fn save(dir: &Path, slot: i64) -> Result<()> {
    let text = SystemClipboard
        .read()
        .context("Clipboard holds no text to save")?;

    let vault = open(dir)?;
    execute(&vault, Command::SetSlot(slot, text), || out_of_range(slot))?;
    println!("{} Saved clipboard to slot {}", style("✓").green(), slot);
    Ok(())
}

/// Put a slot's text on the system clipboard.
pub fn paste(dir: &Path, slot: i64) -> Result<()> {
    let text = read_slot(dir, slot)?;
    SystemClipboard.write(&text);
    println!("{} Slot {} is on the clipboard", style("✓").green(), slot);
    Ok(())
}

fn read_slot(dir: &Path, slot: i64) -> Result<String> {
    let vault = open(dir)?;
    let outcome = execute(&vault, Command::GetSlot(slot), || {
        if (0..SLOT_COUNT as i64).contains(&slot) {
            format!("Slot {} is empty", slot)
        } else {
            out_of_range(slot)
        }
    })?;

    match outcome {
        Outcome::Slot(Some(text)) => Ok(text),
        _ => anyhow::bail!("Slot {} is empty", slot),
    }
}

fn out_of_range(slot: i64) -> String {
    format!("Slot {} is out of range (0-{})", slot, SLOT_COUNT - 1)
}
