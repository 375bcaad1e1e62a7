//! Clipboard change monitor.
//!
//! A background thread polls a [`ClipboardAccess`] implementation on a fixed
//! interval and reports each distinct non-empty value once.

use crate::history::HistoryStore;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Access to the system clipboard, supplied by the embedding application.
pub trait ClipboardAccess: Send + Sync {
    /// Returns the current clipboard text, or `None` if it holds no text or
    /// cannot be read right now.
    fn read(&self) -> Option<String>;

    /// Replaces the clipboard text. Best-effort.
    fn write(&self, text: &str);
}

/// Whether the monitor is polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Not observing the clipboard.
    Idle,
    /// Polling on a background thread.
    Watching,
}

/// Detects changes between successive clipboard reads.
///
/// Holds only the last value seen. Comparison is exact string equality.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_seen: Option<String>,
}

impl ChangeDetector {
    /// Creates a detector that has seen nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one clipboard read. Returns the content if it is a new change.
    ///
    /// Absent and empty reads are ignored and do not reset the last value.
    pub fn observe(&mut self, current: Option<String>) -> Option<String> {
        let current = current.filter(|text| !text.is_empty())?;
        if self.last_seen.as_deref() == Some(current.as_str()) {
            return None;
        }
        self.last_seen = Some(current.clone());
        Some(current)
    }

    /// The last value reported as a change.
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Polls the clipboard on a background thread and reports changes.
///
/// `stop()` (and `Drop`) join the thread, so the callback never runs after
/// the monitor has stopped.
pub struct ChangeMonitor {
    clipboard: Arc<dyn ClipboardAccess>,
    interval: Duration,
    worker: Option<Worker>,
}

impl ChangeMonitor {
    /// Creates an idle monitor polling `clipboard` every `interval`.
    pub fn new(clipboard: Arc<dyn ClipboardAccess>, interval: Duration) -> Self {
        Self {
            clipboard,
            interval,
            worker: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        if self.worker.is_some() {
            MonitorState::Watching
        } else {
            MonitorState::Idle
        }
    }

    /// Poll interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling, calling `on_change` once per distinct change.
    ///
    /// Does nothing if already watching.
    pub fn start<F>(&mut self, mut on_change: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        if self.worker.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let clipboard = Arc::clone(&self.clipboard);
        let interval = self.interval;

        let handle = thread::spawn(move || {
            let mut detector = ChangeDetector::new();
            loop {
                if let Some(content) = detector.observe(clipboard.read()) {
                    debug!(len = content.len(), "clipboard changed");
                    on_change(content);
                }

                // Sleeps for one interval; a stop signal or a dropped sender ends the loop.
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        info!(interval_ms = interval.as_millis() as u64, "clipboard monitor started");
        self.worker = Some(Worker { stop_tx, handle });
    }

    /// Starts polling and adds every change to `store`.
    ///
    /// Failed writes are logged; the monitor keeps running.
    pub fn start_recording(&mut self, store: Arc<HistoryStore>) {
        self.start(move |content| {
            if let Err(e) = store.add_item(&content) {
                warn!("failed to record clipboard change: {}", e);
            }
        });
    }

    /// Stops polling and waits for the current tick to finish.
    ///
    /// Does nothing if idle.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            warn!("clipboard monitor thread panicked");
        }
        info!("clipboard monitor stopped");
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
