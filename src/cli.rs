use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Local-first life tracker. All data lives as per-user JSON collections
/// under the data directory (default ~/.habitsync).
#[derive(Parser)]
#[command(name = "habitsync", version, about = "Personal life tracking with a task board TUI")]
pub struct Cli {
    /// Directory holding the JSON collections.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// User namespace for all reads and writes.
    #[arg(long, global = true, default_value = "default")]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}
