use std::sync::Arc;
use taskdeck_core::{
    Board, BoardStore, JsonSnapshotStore, MoveIntent, SqliteBoardStore, SyncController, SyncPhase,
    TaskDraft,
};

#[test]
fn session_over_sqlite_store_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let task_id = {
        let store: Arc<dyn BoardStore> = Arc::new(SqliteBoardStore::open(&path).unwrap());
        let mut controller = SyncController::new(store, Board::starter());
        controller.start();
        assert_eq!(controller.board(), &Board::starter());

        let task_id = controller
            .create_task(&TaskDraft::titled("Survive restart"), None)
            .unwrap();
        controller
            .apply(&MoveIntent::MoveTask {
                task_id: task_id.clone(),
                target_column_id: "done".to_string(),
                before: None,
            })
            .unwrap();
        controller.wait_idle();
        task_id
    };

    let store: Arc<dyn BoardStore> = Arc::new(SqliteBoardStore::open(&path).unwrap());
    let mut controller = SyncController::new(store, Board::starter());
    controller.start();

    assert_eq!(controller.phase(), SyncPhase::Ready);
    assert!(controller.board().tasks.contains_key(&task_id));
    assert_eq!(
        controller.board().owning_column(&task_id).map(String::as_str),
        Some("done")
    );
}

#[test]
fn snapshot_store_works_as_the_remote() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    {
        let store: Arc<dyn BoardStore> = Arc::new(JsonSnapshotStore::new(&path));
        let mut controller = SyncController::new(store, Board::starter());
        controller.start();
        controller.add_column("Review");
        controller.wait_idle();
    }

    let store: Arc<dyn BoardStore> = Arc::new(JsonSnapshotStore::new(&path));
    let mut controller = SyncController::new(store, Board::starter());
    controller.start();
    assert_eq!(controller.board().column_order.len(), 4);
}

#[test]
fn mirror_receives_every_commit_alongside_the_remote() {
    let dir = tempfile::tempdir().unwrap();
    let remote: Arc<dyn BoardStore> = Arc::new(SqliteBoardStore::in_memory().unwrap());
    let mirror_path = dir.path().join("mirror.json");

    let mut controller = SyncController::new(remote, Board::starter())
        .with_mirror(Box::new(JsonSnapshotStore::new(&mirror_path)));
    controller.start();
    controller
        .create_task(&TaskDraft::titled("Mirrored"), None)
        .unwrap();

    // The mirror write is synchronous; no wait_idle needed for it.
    let mirrored = JsonSnapshotStore::new(&mirror_path)
        .load()
        .unwrap()
        .expect("mirror written");
    assert_eq!(&mirrored, controller.board());
    controller.wait_idle();
}

#[test]
fn corrupt_remote_state_falls_back_to_the_default_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");
    std::fs::write(&path, "{\"tasks\":42}").unwrap();

    let store: Arc<dyn BoardStore> = Arc::new(JsonSnapshotStore::new(&path));
    let mut controller = SyncController::new(store, Board::starter());
    controller.start();

    assert_eq!(controller.phase(), SyncPhase::Ready);
    assert_eq!(controller.board(), &Board::starter());
}
