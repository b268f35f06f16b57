//! Task and column CRUD as pure board transformations.
//!
//! # Responsibility
//! - Create, edit and delete tasks; append new columns.
//! - Generate fresh ids that are unique within the board.
//!
//! # Invariants
//! - Draft validation runs before any structural change; rejected drafts
//!   leave the board untouched.
//! - `delete_task` is total and idempotent.

use crate::engine::{BoardError, BoardResult};
use crate::model::board::{Board, Column, ColumnId, EmailRef, Priority, Task, TaskId};
use uuid::Uuid;

/// Request model for creating or replacing a task's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub division: String,
    pub priority: Priority,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub emails: Vec<EmailRef>,
}

impl TaskDraft {
    /// Minimal draft with only a title; remaining fields take defaults.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            division: self.division,
            priority: self.priority,
            start_date: self.start_date,
            due_date: self.due_date,
            emails: self.emails,
        }
    }
}

/// Creates a task from `draft` and appends it to `target_column`, or to
/// the first column in display order when no target is given.
///
/// # Errors
/// - `NoColumns` when no target is given and the board has no columns.
/// - `InvalidTarget` when the chosen column does not exist.
/// - `InvariantViolation` when the draft fails field validation.
pub fn create_task(
    board: &Board,
    draft: &TaskDraft,
    target_column: Option<&str>,
) -> BoardResult<(Board, TaskId)> {
    let column_id = match target_column {
        Some(column_id) => {
            if !board.columns.contains_key(column_id) {
                return Err(BoardError::InvalidTarget(column_id.to_string()));
            }
            column_id.to_string()
        }
        None => board
            .column_order
            .first()
            .ok_or(BoardError::NoColumns)?
            .clone(),
    };

    let task_id = fresh_task_id(board);
    let task = draft.clone().into_task(task_id.clone());
    check_task_fields(&task)?;

    let mut next = board.clone();
    next.tasks.insert(task_id.clone(), task);
    next.columns
        .get_mut(&column_id)
        .ok_or(BoardError::InvalidTarget(column_id))?
        .task_ids
        .push(task_id.clone());

    Ok((next, task_id))
}

/// Replaces the fields of an existing task. Column membership and position
/// are left untouched.
///
/// # Errors
/// - `NotFound` when `task_id` is absent from the task table.
/// - `InvariantViolation` when the draft fails field validation.
pub fn update_task(board: &Board, task_id: &str, draft: &TaskDraft) -> BoardResult<Board> {
    if !board.tasks.contains_key(task_id) {
        return Err(BoardError::NotFound(task_id.to_string()));
    }

    let task = draft.clone().into_task(task_id.to_string());
    check_task_fields(&task)?;

    let mut next = board.clone();
    next.tasks.insert(task_id.to_string(), task);
    Ok(next)
}

/// Removes a task from the task table and strips it from whichever column
/// lists it. A no-op when the task is already absent.
pub fn delete_task(board: &Board, task_id: &str) -> Board {
    let mut next = board.clone();
    next.tasks.remove(task_id);
    for column in next.columns.values_mut() {
        column.task_ids.retain(|id| id != task_id);
    }
    next
}

/// Appends a new empty column with a fresh id to the end of the display
/// order.
pub fn add_column(board: &Board, title: impl Into<String>) -> (Board, ColumnId) {
    let column_id = fresh_column_id(board);
    let mut next = board.clone();
    next.columns.insert(
        column_id.clone(),
        Column {
            id: column_id.clone(),
            title: title.into(),
            task_ids: Vec::new(),
        },
    );
    next.column_order.push(column_id.clone());
    (next, column_id)
}

fn check_task_fields(task: &Task) -> BoardResult<()> {
    let violations = task.field_violations();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(BoardError::InvariantViolation(violations))
    }
}

// UUIDv4 makes collisions negligible; the containment re-check turns the
// remaining probability into a retry instead of silent id reuse.
fn fresh_task_id(board: &Board) -> TaskId {
    loop {
        let candidate = format!("task-{}", Uuid::new_v4());
        if !board.tasks.contains_key(&candidate) {
            return candidate;
        }
    }
}

fn fresh_column_id(board: &Board) -> ColumnId {
    loop {
        let candidate = format!("column-{}", Uuid::new_v4());
        if !board.columns.contains_key(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{add_column, create_task, delete_task, update_task, TaskDraft};
    use crate::engine::BoardError;
    use crate::model::board::{Board, Priority};

    #[test]
    fn create_appends_to_first_column() {
        let board = Board::starter();
        let (next, task_id) =
            create_task(&board, &TaskDraft::titled("Calibrate CNC"), None).expect("create succeeds");

        assert!(!board.tasks.contains_key(&task_id));
        assert!(next.tasks.contains_key(&task_id));
        assert_eq!(next.owning_column(&task_id).map(String::as_str), Some("backlog"));
        assert!(next.validate().is_empty());
    }

    #[test]
    fn create_appends_to_the_chosen_column() {
        let board = Board::starter();
        let (next, task_id) = create_task(&board, &TaskDraft::titled("Review PR"), Some("todo"))
            .expect("create succeeds");

        assert_eq!(next.owning_column(&task_id).map(String::as_str), Some("todo"));
        assert_eq!(next.columns["todo"].task_ids, [task_id.clone()]);
        assert!(next.validate().is_empty());
    }

    #[test]
    fn create_rejects_unknown_target_column() {
        let board = Board::starter();
        let err = create_task(&board, &TaskDraft::titled("Lost"), Some("phantom"))
            .expect_err("unknown column must fail");
        assert_eq!(err, BoardError::InvalidTarget("phantom".to_string()));
    }

    #[test]
    fn create_on_empty_board_fails_with_no_columns() {
        let err = create_task(&Board::empty(), &TaskDraft::titled("Anything"), None)
            .expect_err("no columns must fail");
        assert_eq!(err, BoardError::NoColumns);
    }

    #[test]
    fn create_rejects_empty_title() {
        let err = create_task(&Board::starter(), &TaskDraft::titled("   "), None)
            .expect_err("empty title must fail");
        assert!(matches!(err, BoardError::InvariantViolation(_)));
    }

    #[test]
    fn create_rejects_malformed_date() {
        let mut draft = TaskDraft::titled("Dated");
        draft.due_date = Some("tomorrow".to_string());
        let err = create_task(&Board::starter(), &draft, None).expect_err("bad date must fail");
        assert!(matches!(err, BoardError::InvariantViolation(_)));
    }

    #[test]
    fn generated_ids_are_unique_per_call() {
        let board = Board::starter();
        let (board, first) = create_task(&board, &TaskDraft::titled("One"), None).expect("create");
        let (board, second) = create_task(&board, &TaskDraft::titled("Two"), None).expect("create");
        assert_ne!(first, second);
        assert!(board.validate().is_empty());
    }

    #[test]
    fn update_replaces_fields_but_not_position() {
        let (board, task_id) =
            create_task(&Board::starter(), &TaskDraft::titled("Draft"), None).expect("create");
        let mut draft = TaskDraft::titled("Final");
        draft.division = "Production".to_string();
        draft.priority = Priority::Urgent;
        draft.start_date = Some("2024-01-01".to_string());

        let next = update_task(&board, &task_id, &draft).expect("update succeeds");
        let task = &next.tasks[&task_id];
        assert_eq!(task.title, "Final");
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(
            next.owning_column(&task_id),
            board.owning_column(&task_id),
            "column membership must not change"
        );
    }

    #[test]
    fn update_missing_task_fails_with_not_found() {
        let err = update_task(&Board::starter(), "ghost", &TaskDraft::titled("X"))
            .expect_err("missing task must fail");
        assert_eq!(err, BoardError::NotFound("ghost".to_string()));
    }

    #[test]
    fn delete_is_idempotent() {
        let (board, task_id) =
            create_task(&Board::starter(), &TaskDraft::titled("Short lived"), None).expect("create");
        let once = delete_task(&board, &task_id);
        let twice = delete_task(&once, &task_id);
        assert_eq!(once, twice);
        assert!(once.owning_column(&task_id).is_none());
        assert!(once.validate().is_empty());
    }

    #[test]
    fn add_column_appends_to_order() {
        let (next, column_id) = add_column(&Board::starter(), "Review");
        assert_eq!(next.column_order.last(), Some(&column_id));
        assert!(next.columns[&column_id].task_ids.is_empty());
        assert!(next.validate().is_empty());
    }
}
