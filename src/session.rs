//! Board session: one mutation-and-persist sequence per user action.
//!
//! The session owns the control flow behind every board action: apply
//! the in-memory mutation, then save through the persistence backend,
//! then record the activity message. Persistence and activity failures
//! never roll back the mutation; they come back as warnings on the
//! operation outcome so the caller can surface them. The visible state
//! change is immediate and never gated on the backend.

use tracing::warn;

use crate::activity::ActivityLog;
use crate::board::{Board, MovedTask};
use crate::error::Result;
use crate::persist::{Change, Persistence};
use crate::task::{Category, Task, TaskDraft, TaskPatch};

/// Result of a session operation plus any non-fatal warnings
/// (persistence failures, data-integrity findings).
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

/// A live board bound to a persistence backend and an activity log.
pub struct Session {
    board: Board,
    backend: Box<dyn Persistence>,
    activity: ActivityLog,
    load_warnings: Vec<String>,
}

impl Session {
    /// Load the board from the backend and repair anything a corrupted
    /// store left behind. Load problems downgrade to an empty board
    /// inside the backend; repair findings are kept for the caller.
    pub fn open(mut backend: Box<dyn Persistence>, activity: ActivityLog) -> Result<Self> {
        let mut board = backend.load()?;
        let load_warnings = board.repair();
        Ok(Self {
            board,
            backend,
            activity,
            load_warnings,
        })
    }

    /// Data-integrity warnings found while loading.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Read-only view of the current board state.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The activity recorder backing this session.
    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Create a task in a column.
    ///
    /// When the backend assigns the record its own id on save, that id
    /// replaces the minted one on the board and in the result, so the
    /// id shown to the caller is the one later operations accept.
    pub fn add_task(&mut self, category: Category, draft: TaskDraft) -> Result<Outcome<Task>> {
        let mut task = self.board.add_task(category, draft)?;

        let mut warnings = Vec::new();
        if let Some(new_id) = self.persist(Change::Created(task.clone()), &mut warnings) {
            self.board.adopt_id(&task.id, &new_id);
            task.id = new_id;
        }
        self.record(
            format!("New task \"{}\" created", task.title),
            &mut warnings,
        );

        Ok(Outcome {
            value: task,
            warnings,
        })
    }

    /// Move a task to another column. Unknown ids and same-category
    /// targets are no-ops: nothing is persisted or logged.
    pub fn move_task(&mut self, id: &str, target: Category) -> Result<Outcome<Option<MovedTask>>> {
        let mut warnings = Vec::new();
        self.check_duplicates(id, &mut warnings);

        let Some(moved) = self.board.move_task(id, target) else {
            return Ok(Outcome {
                value: None,
                warnings,
            });
        };

        self.persist(
            Change::Moved {
                id: moved.task.id.clone(),
                category: moved.to,
            },
            &mut warnings,
        );
        self.record(
            format!(
                "Task \"{}\" moved from {} to {}",
                moved.task.title, moved.from, moved.to
            ),
            &mut warnings,
        );

        Ok(Outcome {
            value: Some(moved),
            warnings,
        })
    }

    /// Edit the mutable fields of a task.
    pub fn edit_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Outcome<Task>> {
        let mut warnings = Vec::new();
        self.check_duplicates(id, &mut warnings);

        let task = self.board.edit_task(id, patch)?;

        self.persist(Change::Edited(task.clone()), &mut warnings);
        self.record(format!("Task \"{}\" updated", task.title), &mut warnings);

        Ok(Outcome {
            value: task,
            warnings,
        })
    }

    /// Delete a task from its owning column.
    pub fn delete_task(&mut self, id: &str) -> Result<Outcome<Task>> {
        let mut warnings = Vec::new();
        self.check_duplicates(id, &mut warnings);

        let task = self.board.delete_task(id)?;

        self.persist(
            Change::Deleted {
                id: task.id.clone(),
            },
            &mut warnings,
        );
        self.record(format!("Task \"{}\" deleted", task.title), &mut warnings);

        Ok(Outcome {
            value: task,
            warnings,
        })
    }

    fn persist(&mut self, change: Change, warnings: &mut Vec<String>) -> Option<String> {
        match self.backend.apply(&self.board, &change) {
            Ok(adopted_id) => adopted_id,
            Err(err) => {
                warn!(%err, "persistence failed; in-memory state kept");
                warnings.push(format!("persistence failed: {err}"));
                None
            }
        }
    }

    fn record(&mut self, message: String, warnings: &mut Vec<String>) {
        if let Err(err) = self.activity.record(message) {
            warn!(%err, "activity log write failed");
            warnings.push(format!("activity log write failed: {err}"));
        }
    }

    fn check_duplicates(&self, id: &str, warnings: &mut Vec<String>) {
        if self.board.occurrences(id) > 1 {
            warnings.push(format!(
                "task id {id} appears in more than one column; operating on the first match"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// In-memory backend that records every change, can be told to
    /// fail saves, and can assign its own id on create.
    struct MemStore {
        initial: Board,
        fail_saves: bool,
        assigned_id: Option<String>,
        changes: Arc<Mutex<Vec<Change>>>,
    }

    impl MemStore {
        fn new() -> (Self, Arc<Mutex<Vec<Change>>>) {
            Self::with_board(Board::empty())
        }

        fn with_board(initial: Board) -> (Self, Arc<Mutex<Vec<Change>>>) {
            let changes = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    initial,
                    fail_saves: false,
                    assigned_id: None,
                    changes: changes.clone(),
                },
                changes,
            )
        }
    }

    impl Persistence for MemStore {
        fn load(&mut self) -> Result<Board> {
            Ok(self.initial.clone())
        }

        fn apply(&mut self, _board: &Board, change: &Change) -> Result<Option<String>> {
            if self.fail_saves {
                return Err(Error::Persistence("backend down".to_string()));
            }
            self.changes.lock().unwrap().push(change.clone());
            match change {
                Change::Created(_) => Ok(self.assigned_id.clone()),
                _ => Ok(None),
            }
        }
    }

    fn open_session(store: MemStore) -> (Session, TempDir) {
        let temp = TempDir::new().unwrap();
        let activity = ActivityLog::new(temp.path().join("activity.jsonl"));
        let session = Session::open(Box::new(store), activity).unwrap();
        (session, temp)
    }

    #[test]
    fn add_then_move_scenario() {
        let (store, changes) = MemStore::new();
        let (mut session, _temp) = open_session(store);

        let added = session
            .add_task(Category::ToDo, TaskDraft::new("A"))
            .unwrap();
        assert!(added.warnings.is_empty());

        let moved = session.move_task(&added.value.id, Category::Done).unwrap();
        assert!(moved.value.is_some());

        let board = session.board();
        assert!(board.tasks(Category::ToDo).is_empty());
        assert!(board.tasks(Category::InProgress).is_empty());
        assert_eq!(board.tasks(Category::Done).len(), 1);
        assert_eq!(board.tasks(Category::Done)[0].category, Category::Done);

        let log = session.activity().read_all().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].message, "New task \"A\" created");
        assert_eq!(log[1].message, "Task \"A\" moved from To-Do to Done");

        let changes = changes.lock().unwrap();
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], Change::Created(_)));
        assert!(matches!(changes[1], Change::Moved { .. }));
    }

    #[test]
    fn save_failure_keeps_the_mutation_and_warns() {
        let (mut store, _) = MemStore::new();
        store.fail_saves = true;
        let (mut session, _temp) = open_session(store);

        let outcome = session
            .add_task(Category::ToDo, TaskDraft::new("A"))
            .unwrap();

        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("persistence failed")));
        // The in-memory mutation stands
        assert_eq!(session.board().tasks(Category::ToDo).len(), 1);
        // The activity entry was still recorded
        assert_eq!(session.activity().read_all().unwrap().len(), 1);
    }

    #[test]
    fn backend_assigned_id_replaces_the_minted_one() {
        let (mut store, changes) = MemStore::new();
        store.assigned_id = Some("srv-1".to_string());
        let (mut session, _temp) = open_session(store);

        let added = session
            .add_task(Category::ToDo, TaskDraft::new("A"))
            .unwrap();

        // The reported id is the one the backend knows
        assert_eq!(added.value.id, "srv-1");
        assert_eq!(session.board().len(), 1);
        assert!(session.board().find("srv-1").is_some());

        // Follow-up operations carry the adopted id to the backend
        session.delete_task("srv-1").unwrap();
        let changes = changes.lock().unwrap();
        assert!(matches!(&changes[1], Change::Deleted { id } if id == "srv-1"));
    }

    #[test]
    fn noop_move_persists_and_logs_nothing() {
        let (store, changes) = MemStore::new();
        let (mut session, _temp) = open_session(store);
        let added = session
            .add_task(Category::ToDo, TaskDraft::new("A"))
            .unwrap();

        let same = session.move_task(&added.value.id, Category::ToDo).unwrap();
        assert!(same.value.is_none());
        let missing = session.move_task("missing", Category::Done).unwrap();
        assert!(missing.value.is_none());

        assert_eq!(changes.lock().unwrap().len(), 1); // just the add
        assert_eq!(session.activity().read_all().unwrap().len(), 1);
    }

    #[test]
    fn validation_failure_touches_nothing() {
        let (store, changes) = MemStore::new();
        let (mut session, _temp) = open_session(store);

        let err = session
            .add_task(Category::ToDo, TaskDraft::new(""))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(session.board().is_empty());
        assert!(changes.lock().unwrap().is_empty());
        assert!(session.activity().read_all().unwrap().is_empty());
    }

    #[test]
    fn delete_and_edit_record_their_messages() {
        let (store, _) = MemStore::new();
        let (mut session, _temp) = open_session(store);
        let added = session
            .add_task(Category::ToDo, TaskDraft::new("A"))
            .unwrap();

        session
            .edit_task(
                &added.value.id,
                &TaskPatch {
                    title: Some("B".to_string()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        session.delete_task(&added.value.id).unwrap();

        let log = session.activity().read_all().unwrap();
        let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "New task \"A\" created",
                "Task \"B\" updated",
                "Task \"B\" deleted"
            ]
        );
    }

    #[test]
    fn duplicate_ids_from_a_corrupt_load_are_flagged() {
        let mut corrupt = Board::empty();
        let task = corrupt.add_task(Category::ToDo, TaskDraft::new("A")).unwrap();
        let mut clone = task.clone();
        clone.category = Category::Done;
        corrupt.restore(clone);

        let (store, _) = MemStore::with_board(corrupt);
        let (mut session, _temp) = open_session(store);

        assert!(session
            .load_warnings()
            .iter()
            .any(|w| w.contains("more than one column")));

        let outcome = session.delete_task(&task.id).unwrap();
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("first match")));
        // Only the first match was removed
        assert_eq!(session.board().occurrences(&task.id), 1);
    }
}
