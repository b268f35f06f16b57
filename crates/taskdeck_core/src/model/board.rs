//! Board domain model and structural validation.
//!
//! # Responsibility
//! - Define `Task`, `Column` and `Board` with their wire-stable JSON shape.
//! - Provide `Board::validate` as the single structural integrity check.
//!
//! # Invariants
//! - Every id in every `Column.task_ids` exists in the task table.
//! - Every task id appears in exactly one column across the whole board.
//! - `column_order` is a permutation of the column table keys.
//! - Map keys always equal the embedded `id` of the mapped value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Stable task identifier. Wire ids are caller-visible free strings.
pub type TaskId = String;

/// Stable column identifier.
pub type ColumnId = String;

static CALENDAR_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid calendar date regex"));

/// Task urgency bucket, serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Reference to an attached mail item; only a display name is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRef {
    pub name: String,
}

/// A unit of work. Tasks do not know which column holds them; ownership
/// lives exclusively in `Column.task_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form organizational unit (e.g. "Software", "Production").
    pub division: String,
    pub priority: Priority,
    /// Calendar date `YYYY-MM-DD`, no time component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Calendar date `YYYY-MM-DD`, no time component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Ordered attachment references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<EmailRef>,
}

/// An ordered bucket of task ids with a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<TaskId>,
}

/// The complete board state: task table, column table and column order.
///
/// `BTreeMap` keeps iteration deterministic, which makes owner scans and
/// serialized output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub tasks: BTreeMap<TaskId, Task>,
    pub columns: BTreeMap<ColumnId, Column>,
    pub column_order: Vec<ColumnId>,
}

/// One violated structural invariant reported by `Board::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A column lists a task id missing from the task table.
    UnknownTask { column_id: ColumnId, task_id: TaskId },
    /// A task id is listed more than once, within or across columns.
    DuplicateTaskRef { task_id: TaskId },
    /// A task exists in the task table but no column lists it.
    OrphanTask { task_id: TaskId },
    /// `column_order` references a column missing from the column table.
    UnknownColumn { column_id: ColumnId },
    /// A column exists in the column table but not in `column_order`.
    UnlistedColumn { column_id: ColumnId },
    /// A column id appears more than once in `column_order`.
    DuplicateColumnRef { column_id: ColumnId },
    /// A task-table key differs from the stored task's own id.
    TaskKeyMismatch { key: TaskId, id: TaskId },
    /// A column-table key differs from the stored column's own id.
    ColumnKeyMismatch { key: ColumnId, id: ColumnId },
    /// A task title is empty or whitespace-only.
    EmptyTaskTitle { task_id: TaskId },
    /// A task date field is not a `YYYY-MM-DD` calendar date.
    BadCalendarDate {
        task_id: TaskId,
        field: &'static str,
        value: String,
    },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask { column_id, task_id } => {
                write!(f, "column `{column_id}` lists unknown task `{task_id}`")
            }
            Self::DuplicateTaskRef { task_id } => {
                write!(f, "task `{task_id}` is listed by more than one position")
            }
            Self::OrphanTask { task_id } => {
                write!(f, "task `{task_id}` is not listed by any column")
            }
            Self::UnknownColumn { column_id } => {
                write!(f, "column order references unknown column `{column_id}`")
            }
            Self::UnlistedColumn { column_id } => {
                write!(f, "column `{column_id}` is missing from column order")
            }
            Self::DuplicateColumnRef { column_id } => {
                write!(f, "column `{column_id}` appears twice in column order")
            }
            Self::TaskKeyMismatch { key, id } => {
                write!(f, "task table key `{key}` holds task with id `{id}`")
            }
            Self::ColumnKeyMismatch { key, id } => {
                write!(f, "column table key `{key}` holds column with id `{id}`")
            }
            Self::EmptyTaskTitle { task_id } => {
                write!(f, "task `{task_id}` has an empty title")
            }
            Self::BadCalendarDate {
                task_id,
                field,
                value,
            } => {
                write!(
                    f,
                    "task `{task_id}` field `{field}` is not a calendar date: `{value}`"
                )
            }
        }
    }
}

impl Task {
    /// Returns this task's field-level violations (empty title, malformed
    /// dates). Structural placement is the board's concern, not the task's.
    pub fn field_violations(&self) -> Vec<InvariantViolation> {
        let mut out = Vec::new();
        if self.title.trim().is_empty() {
            out.push(InvariantViolation::EmptyTaskTitle {
                task_id: self.id.clone(),
            });
        }
        for (field, value) in [
            ("startDate", self.start_date.as_deref()),
            ("dueDate", self.due_date.as_deref()),
        ] {
            if let Some(value) = value {
                if !CALENDAR_DATE_RE.is_match(value) {
                    out.push(InvariantViolation::BadCalendarDate {
                        task_id: self.id.clone(),
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        out
    }
}

impl Board {
    /// Creates an empty board with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the default seed board: Backlog / To Do / Done, no tasks.
    ///
    /// Used when no persisted state exists or the persisted state fails
    /// validation.
    pub fn starter() -> Self {
        let mut board = Self::empty();
        for (id, title) in [("backlog", "Backlog"), ("todo", "To Do"), ("done", "Done")] {
            board.columns.insert(
                id.to_string(),
                Column {
                    id: id.to_string(),
                    title: title.to_string(),
                    task_ids: Vec::new(),
                },
            );
            board.column_order.push(id.to_string());
        }
        board
    }

    /// Returns the id of the column listing `task_id`, scanning in display
    /// order. `None` when no column lists it.
    pub fn owning_column(&self, task_id: &str) -> Option<&ColumnId> {
        self.column_order.iter().find(|column_id| {
            self.columns
                .get(column_id.as_str())
                .is_some_and(|column| column.task_ids.iter().any(|id| id == task_id))
        })
    }

    /// Checks every structural invariant and returns the full list of
    /// violations. An empty list means the board is well-formed.
    ///
    /// Pure and side-effect free; callers decide the failure policy
    /// (tests assert emptiness, the sync controller fails closed).
    pub fn validate(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for (key, task) in &self.tasks {
            if key != &task.id {
                violations.push(InvariantViolation::TaskKeyMismatch {
                    key: key.clone(),
                    id: task.id.clone(),
                });
            }
            violations.extend(task.field_violations());
        }

        for (key, column) in &self.columns {
            if key != &column.id {
                violations.push(InvariantViolation::ColumnKeyMismatch {
                    key: key.clone(),
                    id: column.id.clone(),
                });
            }
        }

        let mut seen_tasks: BTreeSet<&str> = BTreeSet::new();
        for column in self.columns.values() {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    violations.push(InvariantViolation::UnknownTask {
                        column_id: column.id.clone(),
                        task_id: task_id.clone(),
                    });
                }
                if !seen_tasks.insert(task_id.as_str()) {
                    violations.push(InvariantViolation::DuplicateTaskRef {
                        task_id: task_id.clone(),
                    });
                }
            }
        }
        for task_id in self.tasks.keys() {
            if !seen_tasks.contains(task_id.as_str()) {
                violations.push(InvariantViolation::OrphanTask {
                    task_id: task_id.clone(),
                });
            }
        }

        let mut seen_columns: BTreeSet<&str> = BTreeSet::new();
        for column_id in &self.column_order {
            if !self.columns.contains_key(column_id) {
                violations.push(InvariantViolation::UnknownColumn {
                    column_id: column_id.clone(),
                });
            }
            if !seen_columns.insert(column_id.as_str()) {
                violations.push(InvariantViolation::DuplicateColumnRef {
                    column_id: column_id.clone(),
                });
            }
        }
        for column_id in self.columns.keys() {
            if !seen_columns.contains(column_id.as_str()) {
                violations.push(InvariantViolation::UnlistedColumn {
                    column_id: column_id.clone(),
                });
            }
        }

        violations
    }
}
