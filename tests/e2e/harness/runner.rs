use super::assertions::Assertion;
use super::clipboard::ScriptedClipboard;
use super::clock::MockClock;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, bail, Context, Result};
use clipvault_core::{
    ChangeMonitor, Command, Config, HistoryConfig, MonitorConfig, MonitorState, Outcome, Vault,
    VaultError,
};
use std::sync::Arc;
use std::time::Duration;

/// Poll interval used by scenarios that watch the clipboard.
const TEST_POLL_MS: u64 = 2;

/// How long to wait for the monitor to catch up before failing.
const MONITOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes scenarios against a real vault on disk
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    vault: Option<Vault>,
    monitor: Option<ChangeMonitor>,
    clipboard: Arc<ScriptedClipboard>,
    clock: MockClock,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a runner with a fresh vault limited to `max_entries` (0 = unlimited)
    pub fn new(max_entries: usize) -> Result<Self> {
        let workspace = TestWorkspace::empty()?;
        let clock = MockClock::new();
        let config = Config {
            monitor: MonitorConfig {
                poll_interval_ms: TEST_POLL_MS,
            },
            history: HistoryConfig { max_entries },
        };
        let vault = workspace
            .init_vault(&config)?
            .with_time_provider(clock.as_provider());

        Ok(Self {
            workspace,
            vault: Some(vault),
            monitor: None,
            clipboard: Arc::new(ScriptedClipboard::new()),
            clock,
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::Execute {
                command,
                expect_success,
            } => self.handle_execute(command, *expect_success),
            ScenarioStep::ExpectRejected { command } => self.handle_rejected(command),

            ScenarioStep::UserCopies { text } => self.handle_copy(text.as_deref()),
            ScenarioStep::StartWatching => self.handle_start_watching(),
            ScenarioStep::StopWatching => self.handle_stop_watching(),
            ScenarioStep::PasteSlot { slot } => self.handle_paste_slot(*slot),

            ScenarioStep::Wait { duration } => {
                self.clock.advance(*duration);
                Ok(())
            }
            ScenarioStep::ClockGoesBack { duration } => {
                self.clock.rewind(*duration);
                Ok(())
            }

            ScenarioStep::Crash => self.handle_crash(),
            ScenarioStep::Restart => self.handle_restart(),
            ScenarioStep::WriteRaw { path, content } => self.workspace.write_file(path, content),
            ScenarioStep::AppendRaw { path, content } => self.workspace.append_file(path, content),

            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    fn vault(&self) -> Result<&Vault> {
        self.vault
            .as_ref()
            .ok_or_else(|| anyhow!("Vault not available (crashed?)"))
    }

    // ===== Control surface =====

    fn handle_execute(&mut self, command: &Command, expect_success: bool) -> Result<()> {
        let outcome = self.vault()?.control().execute(command.clone())?;
        if outcome.is_success() != expect_success {
            bail!(
                "Expected success={} for {:?}, got {:?}",
                expect_success,
                command,
                outcome
            );
        }
        Ok(())
    }

    fn handle_rejected(&mut self, command: &Command) -> Result<()> {
        match self.vault()?.control().execute(command.clone()) {
            Err(VaultError::InvalidInput(_)) => Ok(()),
            other => bail!("Expected InvalidInput for {:?}, got {:?}", command, other),
        }
    }

    // ===== Clipboard and monitor =====

    fn handle_copy(&mut self, text: Option<&str>) -> Result<()> {
        self.clipboard.set(text);

        // Three reads: one may predate the copy, the next sees it, and the
        // one after that starts only once the change has been recorded.
        if self.monitor.is_some() && !self.clipboard.wait_for_reads(3, MONITOR_TIMEOUT) {
            bail!("Monitor did not observe the copy in time");
        }
        Ok(())
    }

    fn handle_start_watching(&mut self) -> Result<()> {
        let vault = self.vault()?;
        let mut monitor = vault.monitor(self.clipboard.clone());
        monitor.start_recording(vault.history());

        if monitor.state() != MonitorState::Watching {
            bail!("Monitor did not start");
        }
        if !self.clipboard.wait_for_reads(2, MONITOR_TIMEOUT) {
            bail!("Monitor did not poll after start");
        }
        self.monitor = Some(monitor);
        Ok(())
    }

    fn handle_stop_watching(&mut self) -> Result<()> {
        let mut monitor = self
            .monitor
            .take()
            .ok_or_else(|| anyhow!("Monitor is not running"))?;
        monitor.stop();
        if monitor.state() != MonitorState::Idle {
            bail!("Monitor still watching after stop");
        }
        Ok(())
    }

    fn handle_paste_slot(&mut self, slot: usize) -> Result<()> {
        let command = Command::GetSlot(i64::try_from(slot)?);
        match self.vault()?.control().execute(command)? {
            Outcome::Slot(Some(text)) => self.handle_copy(Some(&text)),
            other => bail!("Slot {} has nothing to paste: {:?}", slot, other),
        }
    }

    // ===== Failure simulation =====

    fn handle_crash(&mut self) -> Result<()> {
        // Leave behind the temp file of an interrupted write.
        self.workspace
            .write_file(".history.cv.99999.0.tmp", b"# clipvault history v1\n@entry 50 0 ")?;
        self.monitor = None;
        self.vault = None;
        Ok(())
    }

    fn handle_restart(&mut self) -> Result<()> {
        let vault = self
            .workspace
            .open_vault()?
            .with_time_provider(self.clock.as_provider());
        self.vault = Some(vault);
        Ok(())
    }

    // ===== Assertions =====

    fn handle_assertion(&mut self, assertion: &Assertion) -> Result<()> {
        let vault = self.vault()?;
        let history = vault.history();

        match assertion {
            Assertion::HistoryContents(expected) => {
                let actual: Vec<String> =
                    history.read_all()?.into_iter().map(|e| e.content).collect();
                if &actual != expected {
                    bail!("History is {:?}, expected {:?}", actual, expected);
                }
            }
            Assertion::HistoryLen(expected) => {
                let actual = history.len()?;
                if actual != *expected {
                    bail!("History has {} entries, expected {}", actual, expected);
                }
            }
            Assertion::Pinned { index, pinned } => {
                let entry = history
                    .get(*index)?
                    .ok_or_else(|| anyhow!("No entry at index {}", index))?;
                if entry.pinned != *pinned {
                    bail!("Entry {} pinned={}, expected {}", index, entry.pinned, pinned);
                }
            }
            Assertion::TimestampAt { index, timestamp } => {
                let entry = history
                    .get(*index)?
                    .ok_or_else(|| anyhow!("No entry at index {}", index))?;
                if &entry.timestamp != timestamp {
                    bail!("Entry {} has timestamp {}, expected {}", index, entry.timestamp, timestamp);
                }
            }
            Assertion::TimestampsNonDecreasing => {
                let entries = history.read_all()?;
                // Newest first, so timestamps must not increase down the list.
                for pair in entries.windows(2) {
                    if pair[0].timestamp < pair[1].timestamp {
                        bail!(
                            "Newer entry {:?} is stamped before older {:?}",
                            pair[0].timestamp,
                            pair[1].timestamp
                        );
                    }
                }
            }
            Assertion::SearchReturns { keyword, contents } => {
                let actual: Vec<String> = history
                    .search(keyword)?
                    .into_iter()
                    .map(|e| e.content)
                    .collect();
                if &actual != contents {
                    bail!("Search {:?} returned {:?}, expected {:?}", keyword, actual, contents);
                }
            }
            Assertion::UndoAvailable(expected) => {
                let available = history.last_deleted()?.is_some();
                if available != *expected {
                    bail!("Undo available={}, expected {}", available, expected);
                }
            }
            Assertion::SlotContains { slot, content } => {
                let actual = vault.slots().get_slot(*slot)?;
                if &actual != content {
                    bail!("Slot {} holds {:?}, expected {:?}", slot, actual, content);
                }
            }
            Assertion::MonitorState(expected) => {
                let actual = self
                    .monitor
                    .as_ref()
                    .map_or(MonitorState::Idle, ChangeMonitor::state);
                if actual != *expected {
                    bail!("Monitor is {:?}, expected {:?}", actual, expected);
                }
            }
            Assertion::ClipboardHolds(expected) => {
                let actual = self.clipboard.current();
                if actual.as_deref() != Some(expected.as_str()) {
                    bail!("Clipboard holds {:?}, expected {:?}", actual, expected);
                }
            }
            Assertion::FileExists(path) => {
                if !self.workspace.file_exists(path) {
                    bail!("Expected file {} to exist", path);
                }
            }
            Assertion::NoTempFiles => {
                let leftovers = self.workspace.temp_files()?;
                if !leftovers.is_empty() {
                    bail!("Found leftover temp files: {:?}", leftovers);
                }
            }
            Assertion::Custom(check) => check(vault)?,
        }
        Ok(())
    }
}
