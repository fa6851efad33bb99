//! Board state store.
//!
//! Sole owner of the in-memory task collection: one ordered task list
//! per category, every mutation funneled through here so the board
//! invariants hold centrally:
//!
//! - a task id appears in at most one column
//! - `task.category` equals the key of the column holding it
//!
//! Lookups scan the columns in `Category::ALL` order. Board sizes are
//! small, so the linear scan doubles as the uniqueness check; there is
//! no secondary id index.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Category, Task, TaskDraft, TaskPatch};

/// The full set of tasks partitioned by category.
///
/// Serializes to the snapshot shape
/// `{"To-Do": [...], "In Progress": [...], "Done": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Board {
    #[serde(rename = "To-Do", default)]
    todo: Vec<Task>,
    #[serde(rename = "In Progress", default)]
    in_progress: Vec<Task>,
    #[serde(rename = "Done", default)]
    done: Vec<Task>,
}

/// Outcome of a successful cross-category move.
#[derive(Debug, Clone, PartialEq)]
pub struct MovedTask {
    pub task: Task,
    pub from: Category,
    pub to: Category,
}

impl Board {
    /// The canonical empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tasks in one column, in insertion order.
    pub fn tasks(&self, category: Category) -> &[Task] {
        match category {
            Category::ToDo => &self.todo,
            Category::InProgress => &self.in_progress,
            Category::Done => &self.done,
        }
    }

    fn column_mut(&mut self, category: Category) -> &mut Vec<Task> {
        match category {
            Category::ToDo => &mut self.todo,
            Category::InProgress => &mut self.in_progress,
            Category::Done => &mut self.done,
        }
    }

    /// All tasks across the board, in category declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        Category::ALL
            .iter()
            .flat_map(move |category| self.tasks(*category).iter())
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a task by id. With a healthy board there is at most one
    /// match; on a corrupted board this deterministically picks the
    /// first match in declaration order.
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.iter().find(|task| task.id == id)
    }

    /// How many columns hold a task with this id. Anything above one is
    /// a data-integrity problem the caller should surface.
    pub fn occurrences(&self, id: &str) -> usize {
        self.iter().filter(|task| task.id == id).count()
    }

    fn locate(&self, id: &str) -> Option<(Category, usize)> {
        for category in Category::ALL {
            if let Some(index) = self.tasks(category).iter().position(|task| task.id == id) {
                return Some((category, index));
            }
        }
        None
    }

    /// Place an already-built task into the column its category names.
    /// Used when rebuilding a board from persisted records; no
    /// validation, the source of truth is the stored data.
    pub fn restore(&mut self, task: Task) {
        self.column_mut(task.category).push(task);
    }

    /// Rewrite a task's id in place. Used when a persistence backend
    /// assigns the record its canonical id on create; position,
    /// category, and every other field are untouched.
    pub fn adopt_id(&mut self, id: &str, new_id: &str) -> bool {
        let Some((category, index)) = self.locate(id) else {
            return false;
        };
        self.column_mut(category)[index].id = new_id.to_string();
        true
    }

    /// Validate the draft, mint a new task, and append it to the column.
    pub fn add_task(&mut self, category: Category, draft: TaskDraft) -> Result<Task> {
        let task = Task::new(category, draft)?;
        self.column_mut(category).push(task.clone());
        Ok(task)
    }

    /// Relocate a task to another column.
    ///
    /// Returns `None` without touching the board when the id is unknown
    /// or the task already sits in the target column.
    pub fn move_task(&mut self, id: &str, target: Category) -> Option<MovedTask> {
        let (source, index) = self.locate(id)?;
        if source == target {
            return None;
        }

        let mut task = self.column_mut(source).remove(index);
        task.category = target;
        self.column_mut(target).push(task.clone());

        Some(MovedTask {
            task,
            from: source,
            to: target,
        })
    }

    /// Replace the mutable fields of a task in place.
    ///
    /// The patch is validated before anything changes; `id`,
    /// `timestamp`, and `category` are preserved. Editing never
    /// relocates a task, only `move_task` does.
    pub fn edit_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Task> {
        patch.validate()?;
        let (category, index) = self
            .locate(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let task = &mut self.column_mut(category)[index];
        patch.apply_to(task);
        Ok(task.clone())
    }

    /// Remove a task from its owning column. Deleting an absent id
    /// fails with `NotFound`, so a second delete of the same task is an
    /// error rather than a silent success.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let (category, index) = self
            .locate(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(self.column_mut(category).remove(index))
    }

    /// Repair a freshly loaded board and report integrity problems.
    ///
    /// Category/column mismatches are fixed toward the owning column
    /// (the column is authoritative for placement). Duplicate ids are
    /// reported but left in place; lookups already resolve them
    /// deterministically to the first match.
    pub fn repair(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        for category in Category::ALL {
            for task in self.column_mut(category).iter_mut() {
                if task.category != category {
                    warnings.push(format!(
                        "task {} stored under {} but tagged {}; repaired to {}",
                        task.id, category, task.category, category
                    ));
                    task.category = category;
                }
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        let mut reported: Vec<&str> = Vec::new();
        for task in self.iter() {
            if seen.contains(&task.id.as_str()) {
                if !reported.contains(&task.id.as_str()) {
                    warnings.push(format!(
                        "task id {} appears in more than one column; operations use the first match",
                        task.id
                    ));
                    reported.push(task.id.as_str());
                }
            } else {
                seen.push(task.id.as_str());
            }
        }

        warnings
    }
}
