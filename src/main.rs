//! # HabitSync - Personal Life Tracking CLI
//!
//! A local-first life tracker with a drag-and-drop style task board and
//! simple daily logs for expenses, sleep, calories, journal and mood.
//!
//! ## Key Features
//!
//! - **Two-Axis Task Board**: Every task sits on a priority board (High /
//!   Medium / Low) and a progress board (To Do / Work In Progress /
//!   Completed) at the same time; moving a card on one board never touches
//!   the other axis
//! - **Optimistic Moves**: Board moves appear instantly and are written
//!   through a single-writer queue; a failed write rolls the board back
//! - **Multiple Interfaces**: Full CLI for automation + interactive TUI
//!   board for visual management
//! - **Local File Storage**: Per-user JSON collections, one file per domain
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! habitsync add "Water the plants" --priority high --due 2026-09-01
//!
//! # Launch the board
//! habitsync board
//!
//! # Move a task from the command line (same gesture path as the board)
//! habitsync move 3 done
//!
//! # Log an expense and check today's summary
//! habitsync log expense add 4.50 --category coffee
//! habitsync dashboard
//! ```
//!
//! Data is stored locally in `~/.habitsync/`, one JSON file per user and
//! collection. Point `--data-dir` somewhere else to keep separate sets.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod engine;
pub mod error;
pub mod fields;
pub mod records;
pub mod repo;
pub mod store;
pub mod task;
pub mod tui {
    pub mod board;
    pub mod colors;
}

use cli::Cli;
use cmd::*;
use records::EntryStore;
use repo::TaskRepository;
use store::FileStorage;

fn data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        dir.clone()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".habitsync")
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let dir = data_dir(&cli);
    let user = cli.user.clone();
    let mut repo = TaskRepository::new(FileStorage::new(&dir)?);

    match cli.command {
        Commands::Add {
            title,
            desc,
            priority,
            status,
            due,
            start,
            end,
        } => cmd_add(&mut repo, &user, title, desc, priority, status, due, start, end),

        Commands::List { status, priority } => cmd_list(&repo, &user, status, priority),

        Commands::View { id } => cmd_view(&repo, &user, id),

        Commands::Update {
            id,
            title,
            desc,
            priority,
            status,
            due,
            start,
            end,
        } => cmd_update(&mut repo, &user, id, title, desc, priority, status, due, start, end),

        Commands::Delete { id } => cmd_delete(&mut repo, &user, id),

        Commands::Clear { yes } => cmd_clear(&mut repo, &user, yes),

        Commands::Move { id, column } => cmd_move(&mut repo, &user, id, &column),

        Commands::Board { axis } => tui::board::run_board(&mut repo, axis, &user),

        Commands::Log { domain } => {
            let mut entries = EntryStore::new(FileStorage::new(&dir)?);
            cmd_log(&mut entries, &user, domain)
        }

        Commands::Dashboard => {
            let entries = EntryStore::new(FileStorage::new(&dir)?);
            cmd_dashboard(&repo, &entries, &user)
        }

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        exit(1);
    }
}
