pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "postdeck")]
#[command(about = "An offline-first terminal photo feed", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/postdeck/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Replace the local cache with the remote collection
    Sync,
    /// Print one page of cached items
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one cached item
    Show {
        /// Item id
        id: i64,
    },
    /// Launch the TUI (default)
    Tui,
}
