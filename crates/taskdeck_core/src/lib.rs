//! Core domain logic for TaskDeck, a single-board task tracker.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sync;

pub use engine::mutate::{add_column, create_task, delete_task, update_task, TaskDraft};
pub use engine::reorder::{reorder, MoveIntent};
pub use engine::{BoardError, BoardResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{
    Board, Column, ColumnId, EmailRef, InvariantViolation, Priority, Task, TaskId,
};
pub use repo::board_repo::SqliteBoardStore;
pub use repo::snapshot_repo::JsonSnapshotStore;
pub use sync::controller::{SyncController, SyncPhase};
pub use sync::store::{BoardStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
