//! System clipboard access through arboard.

use clipvault_core::ClipboardAccess;
use tracing::warn;

/// `ClipboardAccess` backed by the platform clipboard.
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn read(&self) -> Option<String> {
        arboard::Clipboard::new()
            .ok()
            .and_then(|mut cb| cb.get_text().ok())
            .filter(|s| !s.is_empty())
    }

    fn write(&self, text: &str) {
        let result = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_owned()));
        if let Err(e) = result {
            warn!("failed to write clipboard: {}", e);
        }
    }
}
