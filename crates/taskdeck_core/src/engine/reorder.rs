//! Drag-and-drop reorder engine.
//!
//! # Responsibility
//! - Apply one `MoveIntent` to a board and return the reordered board.
//! - Share a single remove-then-insert path for same-column and
//!   cross-column task moves.
//!
//! # Invariants
//! - Insertion indices are computed on the post-removal sequence, never on
//!   an index captured before removal.
//! - Failed moves leave the returned board equal to the input board.

use crate::engine::{BoardError, BoardResult};
use crate::model::board::{Board, ColumnId, TaskId};

/// A requested reorder, not yet applied.
///
/// `before: None` means "append to the end of the target sequence".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveIntent {
    /// Reposition a whole column within the board's column order.
    MoveColumn {
        column_id: ColumnId,
        before: Option<ColumnId>,
    },
    /// Move a task into `target_column_id`, before `before` or to the end.
    /// Same-column reorder is the special case where the target equals the
    /// task's current column.
    MoveTask {
        task_id: TaskId,
        target_column_id: ColumnId,
        before: Option<TaskId>,
    },
}

/// Applies `intent` to `board` and returns the resulting board.
///
/// # Errors
/// - `NotFound` when a moved task is listed by no column.
/// - `InvalidTarget` when a task move names a nonexistent column.
///
/// Column moves never fail: unknown ids and self-referential anchors are
/// no-ops so that stale drag events from the host UI stay harmless.
pub fn reorder(board: &Board, intent: &MoveIntent) -> BoardResult<Board> {
    match intent {
        MoveIntent::MoveColumn { column_id, before } => {
            Ok(move_column(board, column_id, before.as_deref()))
        }
        MoveIntent::MoveTask {
            task_id,
            target_column_id,
            before,
        } => move_task(board, task_id, target_column_id, before.as_deref()),
    }
}

fn move_column(board: &Board, column_id: &str, before: Option<&str>) -> Board {
    if Some(column_id) == before {
        return board.clone();
    }
    let Some(source_index) = board.column_order.iter().position(|id| id == column_id) else {
        return board.clone();
    };

    let mut next = board.clone();
    let moved = next.column_order.remove(source_index);
    let insert_at = before
        .and_then(|anchor| next.column_order.iter().position(|id| id == anchor))
        .unwrap_or(next.column_order.len());
    next.column_order.insert(insert_at, moved);
    next
}

fn move_task(
    board: &Board,
    task_id: &str,
    target_column_id: &str,
    before: Option<&str>,
) -> BoardResult<Board> {
    let source_column_id = board
        .owning_column(task_id)
        .ok_or_else(|| BoardError::NotFound(task_id.to_string()))?
        .clone();
    if !board.columns.contains_key(target_column_id) {
        return Err(BoardError::InvalidTarget(target_column_id.to_string()));
    }

    // The task anchoring to itself means the drag ended on its own card;
    // treat as "no anchor" and append.
    let before = before.filter(|anchor| *anchor != task_id);

    let mut next = board.clone();
    let source = next
        .columns
        .get_mut(&source_column_id)
        .ok_or_else(|| BoardError::NotFound(source_column_id.clone()))?;
    let source_index = source
        .task_ids
        .iter()
        .position(|id| id == task_id)
        .ok_or_else(|| BoardError::NotFound(task_id.to_string()))?;
    let moved = source.task_ids.remove(source_index);

    let target = next
        .columns
        .get_mut(target_column_id)
        .ok_or_else(|| BoardError::InvalidTarget(target_column_id.to_string()))?;
    let insert_at = before
        .and_then(|anchor| target.task_ids.iter().position(|id| id == anchor))
        .unwrap_or(target.task_ids.len());
    target.task_ids.insert(insert_at, moved);

    Ok(next)
}
