//! SQLite-backed board store.
//!
//! # Responsibility
//! - Persist the board into relational `columns` / `tasks` /
//!   `email_attachments` tables with explicit `position` ordering.
//! - Reassemble the board from those tables in position order.
//!
//! # Invariants
//! - `save` replaces the whole board in one transaction (delete-all then
//!   reinsert); a failed save leaves the previous contents intact.
//! - Only tasks listed by a column are persisted; ordering in the tables
//!   mirrors `column_order` and `task_ids` exactly.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::board::{Board, Column, EmailRef, Priority, Task};
use crate::sync::store::{BoardStore, StoreError, StoreResult};
use rusqlite::{params, Connection, Transaction};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

/// Board store over a SQLite connection.
///
/// The connection sits behind a `Mutex` because the sync controller issues
/// saves from background workers.
pub struct SqliteBoardStore {
    conn: Mutex<Connection>,
}

impl SqliteBoardStore {
    /// Opens (and migrates) a board database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: Mutex::new(open_db(path)?),
        })
    }

    /// Opens an in-memory board database. Used by tests and the smoke CLI.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: Mutex::new(open_db_in_memory()?),
        })
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::unavailable("connection lock poisoned"))
    }
}

impl BoardStore for SqliteBoardStore {
    fn load(&self) -> StoreResult<Option<Board>> {
        let conn = self.lock()?;
        load_board(&conn).map_err(into_store_error)
    }

    fn save(&self, board: &Board) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|err| StoreError::unavailable(err.to_string()))?;
        replace_board(&tx, board).map_err(into_store_error)?;
        tx.commit()
            .map_err(|err| StoreError::unavailable(err.to_string()))
    }
}

fn into_store_error(err: LoadStoreError) -> StoreError {
    match err {
        LoadStoreError::Sqlite(err) => StoreError::unavailable(err.to_string()),
        LoadStoreError::Corrupt(reason) => StoreError::corrupt(reason),
    }
}

enum LoadStoreError {
    Sqlite(rusqlite::Error),
    Corrupt(String),
}

impl From<rusqlite::Error> for LoadStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

fn load_board(conn: &Connection) -> Result<Option<Board>, LoadStoreError> {
    let mut board = Board::empty();

    let mut stmt = conn.prepare("SELECT id, title FROM columns ORDER BY position;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        board.columns.insert(
            id.clone(),
            Column {
                id: id.clone(),
                title: row.get(1)?,
                task_ids: Vec::new(),
            },
        );
        board.column_order.push(id);
    }

    // No columns ever saved means no board, not an empty one; the caller
    // should fall back to its default.
    if board.column_order.is_empty() {
        return Ok(None);
    }

    let mut attachments: BTreeMap<String, Vec<EmailRef>> = BTreeMap::new();
    let mut stmt =
        conn.prepare("SELECT task_id, name FROM email_attachments ORDER BY task_id, position;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let task_id: String = row.get(0)?;
        attachments
            .entry(task_id)
            .or_default()
            .push(EmailRef { name: row.get(1)? });
    }

    let mut stmt = conn.prepare(
        "SELECT id, title, division, priority, start_date, due_date, column_id
         FROM tasks ORDER BY position;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        let priority_text: String = row.get(3)?;
        let priority = parse_priority(&priority_text).ok_or_else(|| {
            LoadStoreError::Corrupt(format!(
                "invalid priority `{priority_text}` in tasks.priority"
            ))
        })?;
        let column_id: String = row.get(6)?;

        let task = Task {
            id: id.clone(),
            title: row.get(1)?,
            division: row.get(2)?,
            priority,
            start_date: row.get(4)?,
            due_date: row.get(5)?,
            emails: attachments.remove(&id).unwrap_or_default(),
        };
        board
            .columns
            .get_mut(&column_id)
            .ok_or_else(|| {
                LoadStoreError::Corrupt(format!(
                    "task `{id}` references unknown column `{column_id}`"
                ))
            })?
            .task_ids
            .push(id.clone());
        board.tasks.insert(id, task);
    }

    Ok(Some(board))
}

fn replace_board(tx: &Transaction<'_>, board: &Board) -> Result<(), LoadStoreError> {
    tx.execute_batch(
        "DELETE FROM email_attachments;
         DELETE FROM tasks;
         DELETE FROM columns;",
    )?;

    for (column_position, column_id) in board.column_order.iter().enumerate() {
        let column = board.columns.get(column_id).ok_or_else(|| {
            LoadStoreError::Corrupt(format!("column order references unknown column `{column_id}`"))
        })?;
        tx.execute(
            "INSERT INTO columns (id, title, position) VALUES (?1, ?2, ?3);",
            params![column.id, column.title, column_position as i64],
        )?;

        for (task_position, task_id) in column.task_ids.iter().enumerate() {
            let task = board.tasks.get(task_id).ok_or_else(|| {
                LoadStoreError::Corrupt(format!(
                    "column `{column_id}` lists unknown task `{task_id}`"
                ))
            })?;
            tx.execute(
                "INSERT INTO tasks
                    (id, title, division, priority, start_date, due_date, column_id, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    task.id,
                    task.title,
                    task.division,
                    priority_to_db(task.priority),
                    task.start_date,
                    task.due_date,
                    column.id,
                    task_position as i64,
                ],
            )?;

            for (email_position, email) in task.emails.iter().enumerate() {
                tx.execute(
                    "INSERT INTO email_attachments (task_id, name, position)
                     VALUES (?1, ?2, ?3);",
                    params![task.id, email.name, email_position as i64],
                )?;
            }
        }
    }

    Ok(())
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
        Priority::Urgent => "urgent",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        "urgent" => Some(Priority::Urgent),
        _ => None,
    }
}
