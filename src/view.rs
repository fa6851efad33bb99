//! Read-only projections over board state.
//!
//! Sorting returns a fresh list; the store is never mutated by a view.

use serde::Serialize;

use crate::board::Board;
use crate::task::{Category, Task};

/// Display sort order over the task creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Produce a display-ordered copy of a task list.
///
/// The sort is stable: tasks with equal timestamps keep their relative
/// column order in both directions.
pub fn project(tasks: &[Task], order: SortOrder) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
    sorted
}

/// Per-category task counts for the board header.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCounts {
    #[serde(rename = "To-Do")]
    pub todo: usize,
    #[serde(rename = "In Progress")]
    pub in_progress: usize,
    #[serde(rename = "Done")]
    pub done: usize,
    pub total: usize,
}

pub fn counts(board: &Board) -> CategoryCounts {
    CategoryCounts {
        todo: board.tasks(Category::ToDo).len(),
        in_progress: board.tasks(Category::InProgress).len(),
        done: board.tasks(Category::Done).len(),
        total: board.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{TimeZone, Utc};

    fn task_at(title: &str, secs: i64) -> Task {
        let mut task = Task::new(Category::ToDo, TaskDraft::new(title)).unwrap();
        task.timestamp = Utc.timestamp_opt(secs, 0).unwrap();
        task
    }

    #[test]
    fn ascending_sort_is_stable_on_ties() {
        // Timestamps [3, 1, 1, 2]; the two 1s must keep their order
        let tasks = vec![
            task_at("t3", 3),
            task_at("first-1", 1),
            task_at("second-1", 1),
            task_at("t2", 2),
        ];

        let sorted = project(&tasks, SortOrder::Ascending);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first-1", "second-1", "t2", "t3"]);
    }

    #[test]
    fn descending_sort_is_stable_on_ties() {
        let tasks = vec![
            task_at("t3", 3),
            task_at("first-1", 1),
            task_at("second-1", 1),
            task_at("t2", 2),
        ];

        let sorted = project(&tasks, SortOrder::Descending);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["t3", "t2", "first-1", "second-1"]);
    }

    #[test]
    fn projection_leaves_the_input_untouched() {
        let tasks = vec![task_at("b", 2), task_at("a", 1)];
        let _ = project(&tasks, SortOrder::Ascending);
        assert_eq!(tasks[0].title, "b");
    }

    #[test]
    fn sort_order_parses_both_spellings() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("Descending"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("sideways"), None);
    }

    #[test]
    fn counts_cover_every_category() {
        let mut board = Board::empty();
        board.add_task(Category::ToDo, TaskDraft::new("A")).unwrap();
        board.add_task(Category::Done, TaskDraft::new("B")).unwrap();
        board.add_task(Category::Done, TaskDraft::new("C")).unwrap();

        let counts = counts(&board);
        assert_eq!(counts.todo, 1);
        assert_eq!(counts.in_progress, 0);
        assert_eq!(counts.done, 2);
        assert_eq!(counts.total, 3);
    }
}
