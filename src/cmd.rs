//! Command definitions and handlers for the CLI interface.

use std::io::{self, Write};

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::board::{Axis, AxisValue};
use crate::cli::Cli;
use crate::engine::{BoardEngine, DragEnd, DropOutcome, Over};
use crate::error::{Error, Result};
use crate::fields::{Priority, Status};
use crate::records::{
    dashboard_summary, mood_stats, CalorieEntry, EntryStore, Expense, JournalEntry, MoodEntry,
    SleepEntry,
};
use crate::repo::TaskRepository;
use crate::store::Storage;
use crate::task::{NewTask, Task, TaskId, TaskPatch};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value = "medium")]
        priority: Priority,
        /// Status: todo | in-progress | done.
        #[arg(long, value_enum, default_value = "todo")]
        status: Status,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// List tasks, sorted ascending by start date.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// View a single task.
    View { id: TaskId },

    /// Update fields on a task.
    Update {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Delete a task. Deleting an unknown id is a no-op.
    Delete { id: TaskId },

    /// Delete every task for the current user.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Move a task to a board column, e.g. `move 3 high` or `move 3 done`.
    Move {
        id: TaskId,
        /// Target column: low | medium | high | todo | in_progress | done.
        column: String,
    },

    /// Launch the interactive kanban board.
    Board {
        /// Axis to open with.
        #[arg(long, value_enum, default_value = "priority")]
        axis: Axis,
    },

    /// Record or list entries in the secondary domains.
    Log {
        #[command(subcommand)]
        domain: LogCommand,
    },

    /// Show the cross-domain summary for today.
    Dashboard,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Expense log.
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Sleep log.
    Sleep {
        #[command(subcommand)]
        action: SleepAction,
    },
    /// Calorie log.
    Calories {
        #[command(subcommand)]
        action: CalorieAction,
    },
    /// Journal.
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Mood log.
    Mood {
        #[command(subcommand)]
        action: MoodAction,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense.
    Add {
        amount: f64,
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long, default_value = "")]
        desc: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List expenses, newest first.
    List,
}

#[derive(Subcommand)]
pub enum SleepAction {
    /// Record a sleep interval (RFC 3339 timestamps).
    Add {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        /// Quality from 1 (poor) to 5 (excellent).
        #[arg(long, default_value_t = 3)]
        quality: u8,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List sleep entries, newest first.
    List,
}

#[derive(Subcommand)]
pub enum CalorieAction {
    /// Record a meal.
    Add {
        calories: u32,
        #[arg(long, default_value = "snack")]
        meal: String,
        /// Food item. May be repeated.
        #[arg(long = "item")]
        items: Vec<String>,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List calorie entries, newest first.
    List,
}

#[derive(Subcommand)]
pub enum JournalAction {
    /// Write a journal entry.
    Add {
        content: String,
        #[arg(long)]
        mood_tag: Option<String>,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List journal entries, newest first.
    List,
}

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record mood and energy levels (1-10).
    Add {
        mood: u8,
        energy: u8,
        #[arg(long)]
        notes: Option<String>,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List mood entries with running averages.
    List,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn print_task_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<8} {:<17} {:<12} {:<12} {}",
        "ID", "Pri", "Status", "Start", "Due", "Title"
    );
    for t in tasks {
        println!(
            "{:<5} {:<8} {:<17} {:<12} {:<12} {}",
            t.id,
            t.priority.label(),
            t.status.label(),
            fmt_date(t.start_date),
            fmt_date(t.due_date),
            t.title
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add<S: Storage>(
    repo: &mut TaskRepository<S>,
    user: &str,
    title: String,
    desc: Option<String>,
    priority: Priority,
    status: Status,
    due: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let task = repo.create(NewTask {
        title,
        description: desc,
        priority,
        status,
        due_date: due,
        start_date: start,
        end_date: end,
        user_id: user.to_string(),
    })?;
    println!("Added task #{}: {}", task.id, task.title);
    Ok(())
}

pub fn cmd_list<S: Storage>(
    repo: &TaskRepository<S>,
    user: &str,
    status: Option<Status>,
    priority: Option<Priority>,
) -> Result<()> {
    let tasks: Vec<Task> = repo
        .list(user)?
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| priority.is_none_or(|p| t.priority == p))
        .collect();
    if tasks.is_empty() {
        println!("No tasks.");
    } else {
        print_task_table(&tasks);
    }
    Ok(())
}

pub fn cmd_view<S: Storage>(repo: &TaskRepository<S>, user: &str, id: TaskId) -> Result<()> {
    let Some(task) = repo.get(id, user)? else {
        return Err(Error::NotFound { id });
    };
    println!("Task #{}: {}", task.id, task.title);
    println!("  Priority:  {}", task.priority.label());
    println!("  Status:    {}", task.status.label());
    println!("  Start:     {}", fmt_date(task.start_date));
    println!("  Due:       {}", fmt_date(task.due_date));
    println!("  End:       {}", fmt_date(task.end_date));
    println!("  Created:   {}", task.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(desc) = &task.description {
        println!("  Description: {desc}");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update<S: Storage>(
    repo: &mut TaskRepository<S>,
    user: &str,
    id: TaskId,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let patch = TaskPatch {
        title,
        description: desc,
        priority,
        status,
        due_date: due,
        start_date: start,
        end_date: end,
    };
    let task = repo.update(id, user, &patch)?;
    println!("Updated task #{}: {}", task.id, task.title);
    Ok(())
}

pub fn cmd_delete<S: Storage>(repo: &mut TaskRepository<S>, user: &str, id: TaskId) -> Result<()> {
    let existed = repo.get(id, user)?.is_some();
    repo.delete(id, user)?;
    if existed {
        println!("Deleted task #{id}");
    } else {
        println!("Task #{id} not found; nothing to delete");
    }
    Ok(())
}

pub fn cmd_clear<S: Storage>(repo: &mut TaskRepository<S>, user: &str, yes: bool) -> Result<()> {
    if !yes {
        print!("Delete all tasks for user '{user}'? [y/N] ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        if !matches!(line.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }
    repo.delete_all(user)?;
    println!("All tasks deleted for user '{user}'");
    Ok(())
}

/// Route a column move through the same gesture path the board TUI uses.
pub fn cmd_move<S: Storage>(
    repo: &mut TaskRepository<S>,
    user: &str,
    id: TaskId,
    column: &str,
) -> Result<()> {
    let Some(value) = AxisValue::from_key(column) else {
        return Err(Error::InvalidRecord {
            reason: format!(
                "unknown column '{column}' (expected low, medium, high, todo, in_progress or done)"
            ),
        });
    };
    if repo.get(id, user)?.is_none() {
        return Err(Error::NotFound { id });
    }

    let mut engine = BoardEngine::new(value.axis(), user);
    engine.refresh(repo)?;
    engine.drag_start(id);
    let outcome = engine.drag_end(DragEnd {
        active: id,
        over: Some(Over::Column(column.to_string())),
    });
    match outcome {
        DropOutcome::Moved(v) => {
            engine.flush(repo)?;
            println!("Task #{id} moved to {}", v.label());
        }
        DropOutcome::Ignored => println!("Task #{id} left where it was"),
    }
    Ok(())
}

pub fn cmd_log<S: Storage>(store: &mut EntryStore<S>, user: &str, domain: LogCommand) -> Result<()> {
    match domain {
        LogCommand::Expense { action } => match action {
            ExpenseAction::Add {
                amount,
                category,
                desc,
                date,
            } => {
                let entry = store.add(
                    user,
                    Expense::new(user, amount, &desc, &category, date.unwrap_or_else(today)),
                )?;
                println!("Logged expense #{}: {:.2} ({})", entry.id, entry.amount, entry.category);
            }
            ExpenseAction::List => {
                let entries: Vec<Expense> = store.list(user)?;
                println!("{:<5} {:<12} {:>10}  {:<12} {}", "ID", "Date", "Amount", "Category", "Description");
                for e in &entries {
                    println!(
                        "{:<5} {:<12} {:>10.2}  {:<12} {}",
                        e.id, e.date, e.amount, e.category, e.description
                    );
                }
            }
        },
        LogCommand::Sleep { action } => match action {
            SleepAction::Add {
                start,
                end,
                quality,
                notes,
            } => {
                let entry = store.add(user, SleepEntry::new(user, start, end, quality, notes))?;
                println!(
                    "Logged sleep #{}: {:.1}h, quality {}/5",
                    entry.id,
                    entry.hours_slept(),
                    entry.quality
                );
            }
            SleepAction::List => {
                let entries: Vec<SleepEntry> = store.list(user)?;
                println!("{:<5} {:<12} {:>7} {:>9}  {}", "ID", "Date", "Hours", "Quality", "Notes");
                for e in &entries {
                    println!(
                        "{:<5} {:<12} {:>7.1} {:>9}  {}",
                        e.id,
                        e.start_time.date_naive(),
                        e.hours_slept(),
                        e.quality,
                        e.notes.as_deref().unwrap_or("-")
                    );
                }
            }
        },
        LogCommand::Calories { action } => match action {
            CalorieAction::Add {
                calories,
                meal,
                items,
                date,
            } => {
                let entry = store.add(
                    user,
                    CalorieEntry::new(user, calories, &meal, items, date.unwrap_or_else(today)),
                )?;
                println!("Logged {} kcal ({}) as #{}", entry.calories, entry.meal_type, entry.id);
            }
            CalorieAction::List => {
                let entries: Vec<CalorieEntry> = store.list(user)?;
                println!("{:<5} {:<12} {:>8}  {:<10} {}", "ID", "Date", "Kcal", "Meal", "Items");
                for e in &entries {
                    println!(
                        "{:<5} {:<12} {:>8}  {:<10} {}",
                        e.id,
                        e.date,
                        e.calories,
                        e.meal_type,
                        e.food_items.join(", ")
                    );
                }
            }
        },
        LogCommand::Journal { action } => match action {
            JournalAction::Add {
                content,
                mood_tag,
                date,
            } => {
                let entry = store.add(
                    user,
                    JournalEntry::new(user, &content, mood_tag, date.unwrap_or_else(today)),
                )?;
                println!("Journal entry #{} saved", entry.id);
            }
            JournalAction::List => {
                let entries: Vec<JournalEntry> = store.list(user)?;
                for e in &entries {
                    let tag = e
                        .mood_tag
                        .as_deref()
                        .map(|t| format!(" [{t}]"))
                        .unwrap_or_default();
                    println!("#{} {}{}\n  {}", e.id, e.date, tag, e.content);
                }
            }
        },
        LogCommand::Mood { action } => match action {
            MoodAction::Add {
                mood,
                energy,
                notes,
                date,
            } => {
                let entry = store.add(
                    user,
                    MoodEntry::new(user, mood, energy, notes, date.unwrap_or_else(today)),
                )?;
                println!(
                    "Logged mood #{}: mood {}/10, energy {}/10",
                    entry.id, entry.mood_level, entry.energy_level
                );
            }
            MoodAction::List => {
                let entries: Vec<MoodEntry> = store.list(user)?;
                println!("{:<5} {:<12} {:>5} {:>7}  {}", "ID", "Date", "Mood", "Energy", "Notes");
                for e in &entries {
                    println!(
                        "{:<5} {:<12} {:>5} {:>7}  {}",
                        e.id,
                        e.date,
                        e.mood_level,
                        e.energy_level,
                        e.notes.as_deref().unwrap_or("-")
                    );
                }
                let stats = mood_stats(&entries);
                if stats.total_entries > 0 {
                    println!(
                        "Average mood {:.1}, average energy {:.1} over {} entries",
                        stats.average_mood, stats.average_energy, stats.total_entries
                    );
                }
            }
        },
    }
    Ok(())
}

pub fn cmd_dashboard<S: Storage>(
    repo: &TaskRepository<S>,
    store: &EntryStore<S>,
    user: &str,
) -> Result<()> {
    let tasks = repo.list(user)?;
    let expenses: Vec<Expense> = store.list(user)?;
    let sleep: Vec<SleepEntry> = store.list(user)?;
    let calories: Vec<CalorieEntry> = store.list(user)?;
    let summary = dashboard_summary(&tasks, &expenses, &sleep, &calories, today());

    println!("Dashboard for '{user}'");
    println!(
        "  Tasks:    {} total, {} completed, {} high priority",
        summary.tasks_total, summary.tasks_completed, summary.tasks_urgent
    );
    println!("  Spent today:    {:.2}", summary.spent_today);
    match &summary.latest_sleep {
        Some(s) => println!(
            "  Last sleep:     {:.1}h, quality {}/5",
            s.hours_slept(),
            s.quality
        ),
        None => println!("  Last sleep:     -"),
    }
    println!("  Calories today: {}", summary.calories_today);
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "habitsync", &mut io::stdout());
}
