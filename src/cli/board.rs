//! dz board command implementations: add, move, edit, rm, ls, status.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::activity::ActivityLog;
use crate::config::{Backend, Config};
use crate::error::{Error, Result};
use crate::identity;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist::{LocalStore, Persistence, RemoteStore};
use crate::session::Session;
use crate::storage::Storage;
use crate::task::{Category, Task, TaskDraft, TaskPatch};
use crate::view::{self, SortOrder};

/// Global flags shared by every command.
#[derive(Debug, Clone)]
pub struct Globals {
    pub data_dir: Option<PathBuf>,
    pub email: Option<String>,
    pub backend: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl Globals {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub due: Option<String>,
    pub globals: Globals,
}

pub struct MoveOptions {
    pub id: String,
    pub category: String,
    pub globals: Globals,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub globals: Globals,
}

pub struct RmOptions {
    pub id: String,
    pub globals: Globals,
}

pub struct LsOptions {
    pub category: Option<String>,
    pub order: String,
    pub globals: Globals,
}

/// Open the configured session: resolve storage, load config, pick the
/// persistence strategy, and load the board.
pub fn open_session(globals: &Globals) -> Result<Session> {
    let storage = Storage::resolve(globals.data_dir.clone())?;
    storage.init()?;
    let config = Config::load_from_dir(storage.root());

    let backend = match &globals.backend {
        Some(raw) => raw.parse::<Backend>()?,
        None => config.backend,
    };

    let store: Box<dyn Persistence> = match backend {
        Backend::Local => Box::new(LocalStore::new(storage.board_file())),
        Backend::Remote => {
            let email = identity::resolve_identity(&storage, globals.email.as_deref())?
                .ok_or_else(|| {
                    Error::InvalidArgument(
                        "remote backend needs an identity; run dz login <email>".to_string(),
                    )
                })?;
            Box::new(RemoteStore::new(config.remote.base_url.clone(), email))
        }
    };

    let activity =
        ActivityLog::with_retention(storage.activity_file(), config.activity.retain);
    Session::open(store, activity)
}

fn parse_due(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                Error::InvalidArgument(format!("invalid due date '{raw}' (expected YYYY-MM-DD)"))
            }),
    }
}

fn task_detail(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| format!(" due {d}"))
        .unwrap_or_default();
    format!("{} [{}]{} - {}", task.title, task.category, due, task.id)
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let category: Category = options.category.parse()?;
    let draft = TaskDraft {
        title: options.title,
        description: options.description,
        due_date: parse_due(options.due.as_deref())?,
    };

    let mut session = open_session(&options.globals)?;
    let outcome = session.add_task(category, draft)?;
    let task = &outcome.value;

    let mut human = HumanOutput::new(format!("Created task \"{}\" in {}", task.title, category));
    human.push_summary("id", task.id.clone());
    if let Some(due) = task.due_date {
        human.push_summary("due", due.to_string());
    }
    human.push_warnings(session.load_warnings());
    human.push_warnings(&outcome.warnings);

    emit_success(options.globals.output(), "add", task, Some(&human))
}

#[derive(Serialize)]
struct MoveReport {
    id: String,
    moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Category>,
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let target: Category = options.category.parse()?;

    let mut session = open_session(&options.globals)?;
    let outcome = session.move_task(&options.id, target)?;

    let (report, mut human) = match &outcome.value {
        Some(moved) => (
            MoveReport {
                id: moved.task.id.clone(),
                moved: true,
                from: Some(moved.from),
                to: Some(moved.to),
            },
            HumanOutput::new(format!(
                "Moved task \"{}\" from {} to {}",
                moved.task.title, moved.from, moved.to
            )),
        ),
        None => (
            MoveReport {
                id: options.id.clone(),
                moved: false,
                from: None,
                to: None,
            },
            HumanOutput::new(format!(
                "No change: task {} not found or already in {}",
                options.id, target
            )),
        ),
    };

    human.push_warnings(session.load_warnings());
    human.push_warnings(&outcome.warnings);

    emit_success(options.globals.output(), "move", &report, Some(&human))
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let patch = TaskPatch {
        title: options.title,
        description: options.description,
        due_date: parse_due(options.due.as_deref())?,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass --title, --description, or --due".to_string(),
        ));
    }

    let mut session = open_session(&options.globals)?;
    let outcome = session.edit_task(&options.id, &patch)?;
    let task = &outcome.value;

    let mut human = HumanOutput::new(format!("Updated task \"{}\"", task.title));
    human.push_summary("id", task.id.clone());
    human.push_warnings(session.load_warnings());
    human.push_warnings(&outcome.warnings);

    emit_success(options.globals.output(), "edit", task, Some(&human))
}

#[derive(Serialize)]
struct RmReport {
    id: String,
    title: String,
    category: Category,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut session = open_session(&options.globals)?;
    let outcome = session.delete_task(&options.id)?;
    let task = &outcome.value;

    let report = RmReport {
        id: task.id.clone(),
        title: task.title.clone(),
        category: task.category,
    };

    let mut human = HumanOutput::new(format!("Deleted task \"{}\"", task.title));
    human.push_warnings(session.load_warnings());
    human.push_warnings(&outcome.warnings);

    emit_success(options.globals.output(), "rm", &report, Some(&human))
}

#[derive(Serialize)]
struct ColumnView {
    category: Category,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct LsReport {
    columns: Vec<ColumnView>,
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let order = SortOrder::parse(&options.order).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid order '{}' (expected asc|desc)",
            options.order
        ))
    })?;
    let only: Option<Category> = match &options.category {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };

    let session = open_session(&options.globals)?;
    let board = session.board();

    let columns: Vec<ColumnView> = Category::ALL
        .into_iter()
        .filter(|category| only.map_or(true, |c| c == *category))
        .map(|category| ColumnView {
            category,
            tasks: view::project(board.tasks(category), order),
        })
        .collect();
    let report = LsReport { columns };

    let mut human = HumanOutput::new("Board");
    for column in &report.columns {
        human.push_detail(format!(
            "{} ({})",
            column.category,
            column.tasks.len()
        ));
        for task in &column.tasks {
            human.push_detail(format!("  {}", task_detail(task)));
        }
    }
    human.push_warnings(session.load_warnings());

    emit_success(options.globals.output(), "ls", &report, Some(&human))
}

pub fn run_status(globals: Globals) -> Result<()> {
    let session = open_session(&globals)?;
    let counts = view::counts(session.board());

    let mut human = HumanOutput::new("Board status");
    human.push_summary("To-Do", counts.todo.to_string());
    human.push_summary("In Progress", counts.in_progress.to_string());
    human.push_summary("Done", counts.done.to_string());
    human.push_summary("total", counts.total.to_string());
    human.push_warnings(session.load_warnings());

    emit_success(globals.output(), "status", &counts, Some(&human))
}
