//! Error types for clipvault_core operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type for clipvault_core operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The caller passed a value the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A durable record could not be read or written.
    #[error("persistence failure at {}: {}", path.display(), source)]
    Persistence {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The data directory already holds a vault.
    #[error("vault already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

impl VaultError {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn persistence(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput(_) => Some("Clipboard entries must contain at least one character."),
            Self::Persistence { .. } => {
                Some("Check that the data directory exists and is writable (see --data-dir or CLIPVAULT_DIR).")
            }
            Self::Config(_) => Some("Fix or delete config.toml in the data directory to restore defaults."),
            Self::AlreadyInitialized(_) => Some("The vault is ready to use; 'clipvault list' shows its history."),
        }
    }
}

/// Convenience Result type for clipvault_core operations.
pub type Result<T> = std::result::Result<T, VaultError>;
