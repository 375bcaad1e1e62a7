use anyhow::Result;
use clipvault_core::{MonitorState, Vault};

/// Declarative assertions on vault state
pub enum Assertion {
    // History
    HistoryContents(Vec<String>),
    HistoryLen(usize),
    Pinned {
        index: usize,
        pinned: bool,
    },
    TimestampAt {
        index: usize,
        timestamp: String,
    },
    TimestampsNonDecreasing,
    SearchReturns {
        keyword: String,
        contents: Vec<String>,
    },

    // Undo
    UndoAvailable(bool),

    // Slots
    SlotContains {
        slot: usize,
        content: Option<String>,
    },

    // Monitor and clipboard
    MonitorState(MonitorState),
    ClipboardHolds(String),

    // Files
    FileExists(String),
    NoTempFiles,

    // Custom
    Custom(Box<dyn Fn(&Vault) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HistoryContents(c) => write!(f, "HistoryContents({:?})", c),
            Self::HistoryLen(n) => write!(f, "HistoryLen({})", n),
            Self::Pinned { index, pinned } => {
                write!(f, "Pinned {{ index: {}, pinned: {} }}", index, pinned)
            }
            Self::TimestampAt { index, timestamp } => {
                write!(f, "TimestampAt {{ index: {}, timestamp: {:?} }}", index, timestamp)
            }
            Self::TimestampsNonDecreasing => write!(f, "TimestampsNonDecreasing"),
            Self::SearchReturns { keyword, contents } => {
                write!(f, "SearchReturns {{ keyword: {:?}, contents: {:?} }}", keyword, contents)
            }
            Self::UndoAvailable(b) => write!(f, "UndoAvailable({})", b),
            Self::SlotContains { slot, content } => {
                write!(f, "SlotContains {{ slot: {}, content: {:?} }}", slot, content)
            }
            Self::MonitorState(s) => write!(f, "MonitorState({:?})", s),
            Self::ClipboardHolds(s) => write!(f, "ClipboardHolds({:?})", s),
            Self::FileExists(p) => write!(f, "FileExists({:?})", p),
            Self::NoTempFiles => write!(f, "NoTempFiles"),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
