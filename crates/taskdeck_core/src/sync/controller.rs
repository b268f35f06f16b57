//! Sync controller: one session-long owner of the board value.
//!
//! # Responsibility
//! - Seed the board from the remote store once at startup, falling back to
//!   the mirror and then the default on corrupt or unreachable state.
//! - Persist every committed mutation: mirror synchronously (best effort),
//!   remote asynchronously (fire and forget).
//!
//! # Invariants
//! - The in-memory board is replaced synchronously before any persistence
//!   attempt.
//! - Every remote save carries the snapshot captured at commit time, never
//!   a live reference.
//! - Store failures are logged and swallowed; local editing keeps working.

use crate::engine::mutate::{add_column, create_task, delete_task, update_task, TaskDraft};
use crate::engine::reorder::{reorder, MoveIntent};
use crate::engine::BoardResult;
use crate::model::board::{Board, ColumnId, TaskId};
use crate::sync::store::BoardStore;
use log::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Controller lifecycle state. `Saving` is reported while at least one
/// remote save is outstanding; local mutations remain permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    Loading,
    Ready,
    Saving,
}

/// Owns the current board for the lifetime of one session and mediates all
/// persistence traffic.
pub struct SyncController {
    store: Arc<dyn BoardStore>,
    mirror: Option<Box<dyn BoardStore>>,
    board: Board,
    phase: SyncPhase,
    pending_saves: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl SyncController {
    /// Creates an uninitialized controller holding `default_board`. The
    /// default stays in effect until `start` adopts remote state.
    pub fn new(store: Arc<dyn BoardStore>, default_board: Board) -> Self {
        Self {
            store,
            mirror: None,
            board: default_board,
            phase: SyncPhase::Uninitialized,
            pending_saves: Arc::new(AtomicUsize::new(0)),
            workers: Vec::new(),
        }
    }

    /// Attaches a client-visible mirror store written synchronously on every
    /// commit (the browser-storage analogue).
    pub fn with_mirror(mut self, mirror: Box<dyn BoardStore>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Performs the one-time startup load.
    ///
    /// Adopts the remote board when it exists and passes validation. On a
    /// null result, a store failure or an invariant violation it falls back
    /// to the mirror, and only then to the default board. Never fatal,
    /// always ends `Ready`.
    pub fn start(&mut self) {
        self.phase = SyncPhase::Loading;
        info!("event=board_load module=sync status=start");

        match self.store.load() {
            Ok(Some(board)) => {
                let violations = board.validate();
                if violations.is_empty() {
                    info!(
                        "event=board_load module=sync status=ok source=remote tasks={} columns={}",
                        board.tasks.len(),
                        board.columns.len()
                    );
                    self.board = board;
                } else {
                    warn!(
                        "event=board_load module=sync status=rejected reason=invariant_violation count={}",
                        violations.len()
                    );
                    self.adopt_mirror_or_default();
                }
            }
            Ok(None) => {
                info!("event=board_load module=sync status=miss reason=empty_remote");
                self.adopt_mirror_or_default();
            }
            Err(err) => {
                warn!("event=board_load module=sync status=error error={err}");
                self.adopt_mirror_or_default();
            }
        }

        self.phase = SyncPhase::Ready;
    }

    /// Startup fallback when the remote yields nothing usable: adopt the
    /// last mirrored board if one exists and validates, otherwise keep the
    /// default.
    fn adopt_mirror_or_default(&mut self) {
        if let Some(mirror) = &self.mirror {
            match mirror.load() {
                Ok(Some(board)) if board.validate().is_empty() => {
                    info!(
                        "event=board_load module=sync status=ok source=mirror tasks={} columns={}",
                        board.tasks.len(),
                        board.columns.len()
                    );
                    self.board = board;
                    return;
                }
                Ok(Some(_)) => {
                    warn!("event=board_load module=sync status=rejected source=mirror reason=invariant_violation");
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("event=board_load module=sync status=error source=mirror error={err}");
                }
            }
        }
        info!("event=board_load module=sync status=ok source=default");
    }

    /// Current board value.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current lifecycle phase; reports `Saving` while remote saves are in
    /// flight.
    pub fn phase(&self) -> SyncPhase {
        if self.phase == SyncPhase::Ready && self.pending_saves() > 0 {
            SyncPhase::Saving
        } else {
            self.phase
        }
    }

    /// Number of remote saves currently outstanding.
    pub fn pending_saves(&self) -> usize {
        self.pending_saves.load(Ordering::SeqCst)
    }

    /// Adopts `board` as the new current value and persists it: mirror
    /// first (synchronous, best effort), then the remote store on a
    /// background worker. Returns immediately; the session never blocks on
    /// persistence.
    pub fn commit(&mut self, board: Board) {
        self.board = board;

        if let Some(mirror) = &self.mirror {
            if let Err(err) = mirror.save(&self.board) {
                warn!("event=mirror_save module=sync status=error error={err}");
            }
        }

        self.workers.retain(|worker| !worker.is_finished());

        let snapshot = self.board.clone();
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending_saves);
        pending.fetch_add(1, Ordering::SeqCst);
        let worker = std::thread::spawn(move || {
            match store.save(&snapshot) {
                Ok(()) => info!("event=board_save module=sync status=ok"),
                Err(err) => warn!("event=board_save module=sync status=error error={err}"),
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        });
        self.workers.push(worker);
    }

    /// Applies a reorder intent and commits on success.
    pub fn apply(&mut self, intent: &MoveIntent) -> BoardResult<()> {
        let next = reorder(&self.board, intent)?;
        self.commit(next);
        Ok(())
    }

    /// Creates a task from `draft` in `target_column` (first column when
    /// `None`) and commits on success.
    pub fn create_task(
        &mut self,
        draft: &TaskDraft,
        target_column: Option<&str>,
    ) -> BoardResult<TaskId> {
        let (next, task_id) = create_task(&self.board, draft, target_column)?;
        self.commit(next);
        Ok(task_id)
    }

    /// Replaces a task's fields and commits on success.
    pub fn update_task(&mut self, task_id: &str, draft: &TaskDraft) -> BoardResult<()> {
        let next = update_task(&self.board, task_id, draft)?;
        self.commit(next);
        Ok(())
    }

    /// Deletes a task (idempotent) and commits.
    pub fn delete_task(&mut self, task_id: &str) {
        let next = delete_task(&self.board, task_id);
        self.commit(next);
    }

    /// Appends a new column and commits.
    pub fn add_column(&mut self, title: impl Into<String>) -> ColumnId {
        let (next, column_id) = add_column(&self.board, title);
        self.commit(next);
        column_id
    }

    /// Joins all outstanding save workers. Used by tests and orderly
    /// shutdown; normal operation never waits.
    pub fn wait_idle(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
