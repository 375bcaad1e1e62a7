//! Clipvault CLI - Command-line interface for clipboard history.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clipvault_core::VaultError;
use console::style;
use std::path::PathBuf;

mod clipboard;
mod commands;

#[derive(Parser)]
#[command(name = "clipvault")]
#[command(about = "Clipboard history with pinning, undo and quick-paste slots", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (default: $HOME/.clipvault)
    #[arg(long, global = true, env = "CLIPVAULT_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with a default config
    Init,
    /// Add text to the history (reads stdin when no text is given)
    Add {
        /// Text to add
        text: Option<String>,
    },
    /// List history entries, newest first
    List {
        /// Only show pinned entries
        #[arg(long)]
        pinned: bool,
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Search entries (case-insensitive)
    Search {
        /// Keyword to look for
        keyword: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Delete the entry at an index
    Delete {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Pin the entry at an index
    Pin {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Unpin the entry at an index
    Unpin {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Restore the most recently deleted entry
    Undo,
    /// Put the entry at an index on the system clipboard
    Copy {
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Quick-paste slots 0-9
    Slot {
        #[command(subcommand)]
        command: SlotCommands,
    },
    /// Record clipboard changes into the history until Enter is pressed
    Watch {
        /// Poll interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
enum SlotCommands {
    /// Store text in a slot
    Set {
        #[arg(allow_hyphen_values = true)]
        slot: i64,
        /// Text to store
        text: String,
    },
    /// Print a slot
    Get {
        #[arg(allow_hyphen_values = true)]
        slot: i64,
    },
    /// Show every slot that holds text
    List,
    /// Save the current clipboard text into a slot
    Save {
        #[arg(allow_hyphen_values = true)]
        slot: i64,
    },
    /// Put a slot's text on the system clipboard
    Paste {
        #[arg(allow_hyphen_values = true)]
        slot: i64,
    },
}

/// Output format for listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

fn main() {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        if let Some(hint) = e
            .downcast_ref::<VaultError>()
            .and_then(VaultError::recovery_suggestion)
        {
            eprintln!("  {} {}", style("hint:").cyan(), hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = commands::data_dir(cli.data_dir);

    match cli.command {
        Commands::Init => commands::init::run(&dir),
        Commands::Add { text } => commands::history::add(&dir, text),
        Commands::List {
            pinned,
            limit,
            format,
        } => commands::history::list(&dir, pinned, limit, format),
        Commands::Search { keyword, format } => commands::history::search(&dir, &keyword, format),
        Commands::Delete { index } => commands::history::delete(&dir, index),
        Commands::Pin { index } => commands::history::pin(&dir, index),
        Commands::Unpin { index } => commands::history::unpin(&dir, index),
        Commands::Undo => commands::history::undo(&dir),
        Commands::Copy { index } => commands::history::copy(&dir, index),
        Commands::Slot { command } => match command {
            SlotCommands::Set { slot, text } => commands::slot::set(&dir, slot, text),
            SlotCommands::Get { slot } => commands::slot::get(&dir, slot),
            SlotCommands::List => commands::slot::list(&dir),
            SlotCommands::Save { slot } => commands::slot::save(&dir, slot),
            SlotCommands::Paste { slot } => commands::slot::paste(&dir, slot),
        },
        Commands::Watch { interval_ms } => commands::watch::run(&dir, interval_ms),
    }
}
