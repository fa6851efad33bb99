//! Task entity and workflow categories.
//!
//! A task lives in exactly one of three fixed workflow categories. The
//! category stored on the task must always match the board column that
//! holds it; `board` enforces that centrally.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Maximum title length, in characters
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum description length, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// The fixed workflow categories, in board declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "To-Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl Category {
    /// All categories in declaration order. Every board scan walks this
    /// order so duplicate-id lookups are deterministic.
    pub const ALL: [Category; 3] = [Category::ToDo, Category::InProgress, Category::Done];

    /// Canonical display name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Category::ToDo => "To-Do",
            Category::InProgress => "In Progress",
            Category::Done => "Done",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to-do" | "todo" | "to do" => Ok(Category::ToDo),
            "in progress" | "in-progress" | "inprogress" | "doing" => Ok(Category::InProgress),
            "done" => Ok(Category::Done),
            _ => Err(Error::InvalidCategory(raw.to_string())),
        }
    }
}

/// The unit of work tracked by the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque unique identifier, immutable once assigned
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date, no time component
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    /// Creation instant, immutable, default sort key
    pub timestamp: DateTime<Utc>,
}

impl Task {
    /// Mint a new task from validated draft fields.
    pub fn new(category: Category, draft: TaskDraft) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            category,
            timestamp: Utc::now(),
        })
    }
}

/// Input fields for creating a task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
        }
    }

    /// Check the field bounds without mutating anything.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Edit input: the whitelist of mutable fields. `None` leaves a field
/// unchanged; `id`, `timestamp`, and `category` are never editable.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())
    }

    /// Apply the patch to a task, preserving identity fields.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title is required".to_string()));
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(Error::Validation(format!(
            "title is {chars} characters, max is {TITLE_MAX_CHARS}"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    if let Some(description) = description {
        let chars = description.chars().count();
        if chars > DESCRIPTION_MAX_CHARS {
            return Err(Error::Validation(format!(
                "description is {chars} characters, max is {DESCRIPTION_MAX_CHARS}"
            )));
        }
    }
    Ok(())
}
