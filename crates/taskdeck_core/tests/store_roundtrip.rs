use taskdeck_core::{
    add_column, create_task, delete_task, Board, BoardStore, EmailRef, Priority, SqliteBoardStore,
    TaskDraft,
};

fn populated_board() -> Board {
    let mut draft = TaskDraft::titled("Calibrate CNC machine");
    draft.division = "Production".to_string();
    draft.priority = Priority::Urgent;
    draft.start_date = Some("2024-01-01".to_string());
    draft.due_date = Some("2024-01-05".to_string());
    draft.emails.push(EmailRef {
        name: "calibration-request.eml".to_string(),
    });
    draft.emails.push(EmailRef {
        name: "vendor-manual.eml".to_string(),
    });

    let (board, _) = create_task(&Board::starter(), &draft, None).unwrap();
    let (board, _) = create_task(&board, &TaskDraft::titled("Rework dashboard"), None).unwrap();
    let (board, _) = add_column(&board, "Review");
    board
}

#[test]
fn empty_database_loads_as_none() {
    let store = SqliteBoardStore::in_memory().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn save_then_load_round_trips_everything() {
    let store = SqliteBoardStore::in_memory().unwrap();
    let board = populated_board();

    store.save(&board).unwrap();
    let loaded = store.load().unwrap().expect("board present");
    assert_eq!(loaded, board);
    assert!(loaded.validate().is_empty());
}

#[test]
fn save_replaces_the_previous_board_wholesale() {
    let store = SqliteBoardStore::in_memory().unwrap();
    let board = populated_board();
    store.save(&board).unwrap();

    let task_id = board.tasks.keys().next().unwrap().clone();
    let smaller = delete_task(&board, &task_id);
    store.save(&smaller).unwrap();

    let loaded = store.load().unwrap().expect("board present");
    assert_eq!(loaded, smaller);
    assert!(!loaded.tasks.contains_key(&task_id));
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let board = populated_board();

    {
        let store = SqliteBoardStore::open(&path).unwrap();
        store.save(&board).unwrap();
    }

    let reopened = SqliteBoardStore::open(&path).unwrap();
    let loaded = reopened.load().unwrap().expect("board present");
    assert_eq!(loaded, board);
}

#[test]
fn task_order_within_columns_is_preserved() {
    let store = SqliteBoardStore::in_memory().unwrap();

    let mut board = Board::starter();
    for id in ["a", "b", "c"] {
        let (next, _) = create_task(&board, &TaskDraft::titled(id), None).unwrap();
        board = next;
    }
    let original_order = board.columns["backlog"].task_ids.clone();

    store.save(&board).unwrap();
    let loaded = store.load().unwrap().expect("board present");
    assert_eq!(loaded.columns["backlog"].task_ids, original_order);
    assert_eq!(loaded.column_order, board.column_order);
}
