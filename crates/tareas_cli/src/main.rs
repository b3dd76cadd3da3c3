//! Command-line front-end for the tareas core.
//!
//! # Responsibility
//! - Resolve the storage location and inject it into the core.
//! - Translate commands into store calls and render the results.
//!
//! # Invariants
//! - No business rules live here; every decision is delegated to
//!   `tareas_core`.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use std::error::Error;
use std::path::{Path, PathBuf};
use tareas_core::db::open_table_db;
use tareas_core::{
    add, default_log_level, filter, format_due_date, init_logging, is_overdue, remove,
    set_category, set_completed, set_urgent, sorted_by, summarize, Category, DateBucket,
    JsonFileStore, SortKey, StatusIndicator, Task, TaskDraft, TaskFilter, TaskId, TableTaskStore,
    TaskStore,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "tareas",
    version,
    about = "Personal task list over a flat JSON file or a task table"
)]
struct Cli {
    /// Backing JSON file (flat-file mode).
    #[arg(long, env = "TAREAS_FILE", default_value = "tareas.json", global = true)]
    file: PathBuf,

    /// Backing task-table database (table mode); overrides --file.
    #[arg(long, env = "TAREAS_DB", global = true, conflicts_with = "file")]
    db: Option<PathBuf>,

    /// Enable file logging into this directory.
    #[arg(long, env = "TAREAS_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level used when --log-dir is set.
    #[arg(long, env = "TAREAS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new task.
    Add {
        text: String,
        /// Due date as DD/MM/YYYY.
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_parser = parse_category_arg)]
        category: Option<Category>,
        #[arg(long)]
        urgent: bool,
    },
    /// List tasks, optionally filtered and sorted.
    List {
        /// Case-insensitive substring match on the description.
        #[arg(long)]
        search: Option<String>,
        /// Keep only these categories (repeatable).
        #[arg(long = "category", value_parser = parse_category_arg)]
        categories: Vec<Category>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        due: Option<DueArg>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Mark a task as completed.
    Done { id: String },
    /// Mark a completed task as pending again.
    Reopen { id: String },
    /// Move a task to another category.
    SetCategory {
        id: String,
        #[arg(value_parser = parse_category_arg)]
        category: Category,
    },
    /// Flag a task as urgent (or clear the flag with --off).
    Urgent {
        id: String,
        #[arg(long)]
        off: bool,
    },
    /// Delete a task.
    Rm { id: String },
    /// Show aggregate statistics.
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DueArg {
    Today,
    Week,
    Overdue,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    DateAsc,
    DateDesc,
    TextAsc,
    TextDesc,
    PendingFirst,
    CompletedFirst,
    UrgentFirst,
}

impl From<DueArg> for DateBucket {
    fn from(value: DueArg) -> Self {
        match value {
            DueArg::Today => DateBucket::Today,
            DueArg::Week => DateBucket::ThisWeek,
            DueArg::Overdue => DateBucket::Overdue,
        }
    }
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::DateAsc => SortKey::DateAsc,
            SortArg::DateDesc => SortKey::DateDesc,
            SortArg::TextAsc => SortKey::TextAsc,
            SortArg::TextDesc => SortKey::TextDesc,
            SortArg::PendingFirst => SortKey::PendingFirst,
            SortArg::CompletedFirst => SortKey::CompletedFirst,
            SortArg::UrgentFirst => SortKey::UrgentFirst,
        }
    }
}

/// Storage backend selected by the global options.
enum Backend {
    File(JsonFileStore),
    Table(Connection),
}

impl Backend {
    fn open(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        match &cli.db {
            Some(path) => Ok(Self::Table(open_table_db(path)?)),
            None => Ok(Self::File(JsonFileStore::new(&cli.file))),
        }
    }

    fn load_all(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let tasks = match self {
            Self::File(store) => store.load_all()?,
            Self::Table(conn) => TableTaskStore::new(conn).load_all()?,
        };
        Ok(tasks)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = absolute(log_dir)?;
        init_logging(&level, &log_dir.to_string_lossy())?;
    }

    let backend = Backend::open(&cli)?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Add {
            text,
            date,
            category,
            urgent,
        } => {
            let draft = TaskDraft {
                text,
                date,
                category,
                urgent,
            };
            let task = match &backend {
                Backend::File(store) => {
                    let mut tasks = store.load_all()?;
                    let id = add(&mut tasks, draft)?;
                    store.save_all(&tasks)?;
                    tasks
                        .into_iter()
                        .find(|task| task.id == id)
                        .ok_or("added task missing from collection")?
                }
                Backend::Table(conn) => {
                    let task = draft.validate()?;
                    TableTaskStore::new(conn).insert_task(&task)?;
                    task
                }
            };
            println!("added {} {}", short_id(task.id), task.text);
            if is_overdue(&task, today) {
                println!("warning: this task is already overdue");
            }
        }
        Command::List {
            search,
            categories,
            status,
            due,
            sort,
        } => {
            let tasks = backend.load_all()?;
            let criteria = TaskFilter {
                text: search,
                categories: if categories.is_empty() {
                    None
                } else {
                    Some(categories)
                },
                completed: status.map(|value| matches!(value, StatusArg::Completed)),
                due: due.map(Into::into),
            };
            let mut visible: Vec<Task> = filter(&tasks, &criteria, today).cloned().collect();
            if let Some(sort) = sort {
                visible = sorted_by(visible, sort.into());
            }
            if visible.is_empty() {
                println!("no tasks");
            } else {
                for task in &visible {
                    render_task(task, today);
                }
            }
        }
        Command::Done { id } => {
            let id = complete(&backend, &id, true)?;
            println!("completed {}", short_id(id));
        }
        Command::Reopen { id } => {
            let id = complete(&backend, &id, false)?;
            println!("reopened {}", short_id(id));
        }
        Command::SetCategory { id, category } => {
            let mut tasks = backend.load_all()?;
            let id = resolve_id(&tasks, &id)?;
            match &backend {
                Backend::File(store) => {
                    set_category(&mut tasks, id, category)?;
                    store.save_all(&tasks)?;
                }
                Backend::Table(conn) => {
                    let mut task = cloned_task(&tasks, id)?;
                    task.category = category;
                    TableTaskStore::new(conn).update_task(&task)?;
                }
            }
            println!(
                "moved {} to {} {}",
                short_id(id),
                category.emoji(),
                category.wire_label()
            );
        }
        Command::Urgent { id, off } => {
            let mut tasks = backend.load_all()?;
            let id = resolve_id(&tasks, &id)?;
            match &backend {
                Backend::File(store) => {
                    set_urgent(&mut tasks, id, !off)?;
                    store.save_all(&tasks)?;
                }
                Backend::Table(conn) => {
                    let mut task = cloned_task(&tasks, id)?;
                    task.urgent = !off;
                    TableTaskStore::new(conn).update_task(&task)?;
                }
            }
            if off {
                println!("cleared urgency on {}", short_id(id));
            } else {
                println!("flagged {} as urgent", short_id(id));
            }
        }
        Command::Rm { id } => {
            let mut tasks = backend.load_all()?;
            let id = resolve_id(&tasks, &id)?;
            match &backend {
                Backend::File(store) => {
                    remove(&mut tasks, id)?;
                    store.save_all(&tasks)?;
                }
                Backend::Table(conn) => TableTaskStore::new(conn).delete_task(id)?,
            }
            println!("removed {}", short_id(id));
        }
        Command::Stats => {
            let tasks = backend.load_all()?;
            let stats = summarize(&tasks, today);
            println!("total:     {}", stats.total);
            println!("completed: {}", stats.completed);
            println!("pending:   {}", stats.pending);
            println!("urgent:    {}", stats.urgent);
            println!("overdue:   {}", stats.overdue);
            println!("progress:  {:.0}%", stats.percent_complete());
        }
    }

    Ok(())
}

fn complete(backend: &Backend, needle: &str, value: bool) -> Result<TaskId, Box<dyn Error>> {
    let mut tasks = backend.load_all()?;
    let id = resolve_id(&tasks, needle)?;
    match backend {
        Backend::File(store) => {
            set_completed(&mut tasks, id, value)?;
            store.save_all(&tasks)?;
        }
        Backend::Table(conn) => TableTaskStore::new(conn).set_completed(id, value)?,
    }
    Ok(id)
}

fn cloned_task(tasks: &[Task], id: TaskId) -> Result<Task, Box<dyn Error>> {
    tasks
        .iter()
        .find(|task| task.id == id)
        .cloned()
        .ok_or_else(|| "resolved task missing from collection".into())
}

/// Resolves a full uuid or an unambiguous uuid prefix against the collection.
fn resolve_id(tasks: &[Task], needle: &str) -> Result<TaskId, Box<dyn Error>> {
    let needle = needle.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        if tasks.iter().any(|task| task.id == id) {
            return Ok(id);
        }
        return Err(format!("no task matches id `{needle}`").into());
    }

    let matches: Vec<TaskId> = tasks
        .iter()
        .map(|task| task.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("no task matches id `{needle}`").into()),
        _ => Err(format!("id `{needle}` is ambiguous; give more characters").into()),
    }
}

fn parse_category_arg(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| {
        format!("unknown category `{value}`; expected work|personal|health|study|shopping|other")
    })
}

fn render_task(task: &Task, today: NaiveDate) {
    let indicator = StatusIndicator::for_task(task, today);
    let date = task
        .date
        .map(format_due_date)
        .unwrap_or_else(|| "-".to_string());
    let urgent_mark = if task.urgent { "!" } else { " " };
    println!(
        "{} {} {} {:10} {} {:8} {}",
        indicator.icon(),
        short_id(task.id),
        urgent_mark,
        date,
        task.category.emoji(),
        task.category.wire_label(),
        task.text
    );
}

fn short_id(id: TaskId) -> String {
    id.to_string()[..8].to_string()
}

fn absolute(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
