//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdeck_core` linkage.
//! - Run one load -> mutate -> save cycle against an in-memory store.

use std::sync::Arc;
use taskdeck_core::{Board, BoardStore, MoveIntent, SqliteBoardStore, SyncController, TaskDraft};

fn main() {
    println!("taskdeck_core version={}", taskdeck_core::core_version());

    let store: Arc<dyn BoardStore> = match SqliteBoardStore::in_memory() {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!("failed to open in-memory store: {err}");
            std::process::exit(1);
        }
    };

    let mut controller = SyncController::new(store, Board::starter());
    controller.start();

    let task_id = match controller.create_task(&TaskDraft::titled("Smoke-test task"), None) {
        Ok(task_id) => task_id,
        Err(err) => {
            eprintln!("create_task failed: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = controller.apply(&MoveIntent::MoveTask {
        task_id: task_id.clone(),
        target_column_id: "done".to_string(),
        before: None,
    }) {
        eprintln!("move failed: {err}");
        std::process::exit(1);
    }
    controller.wait_idle();

    let board = controller.board();
    println!("columns={}", board.column_order.join(","));
    println!(
        "task owner={}",
        board
            .owning_column(&task_id)
            .map(String::as_str)
            .unwrap_or("none")
    );
    println!("valid={}", board.validate().is_empty());
}
