//! Single-file JSON board store.
//!
//! # Responsibility
//! - Persist the wire-format board into one JSON file.
//! - Serve as the client-visible mirror or as a standalone store where no
//!   database is wanted.
//!
//! # Invariants
//! - A missing file is "never saved" (`Ok(None)`), not an error.
//! - Undecodable file contents are reported as corrupt, never silently
//!   replaced on load.

use crate::model::board::Board;
use crate::sync::store::{BoardStore, StoreError, StoreResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Board store writing the wire-format JSON to a single file.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardStore for JsonSnapshotStore {
    fn load(&self) -> StoreResult<Option<Board>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::unavailable(format!(
                    "cannot read `{}`: {err}",
                    self.path.display()
                )))
            }
        };

        let board = serde_json::from_str(&raw).map_err(|err| {
            StoreError::corrupt(format!("cannot decode `{}`: {err}", self.path.display()))
        })?;
        Ok(Some(board))
    }

    fn save(&self, board: &Board) -> StoreResult<()> {
        let raw = serde_json::to_string(board)
            .map_err(|err| StoreError::corrupt(format!("cannot encode board: {err}")))?;
        std::fs::write(&self.path, raw).map_err(|err| {
            StoreError::unavailable(format!("cannot write `{}`: {err}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::JsonSnapshotStore;
    use crate::model::board::Board;
    use crate::sync::store::{BoardStore, StoreError};

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonSnapshotStore::new(dir.path().join("board.json"));
        assert_eq!(store.load().expect("load succeeds"), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonSnapshotStore::new(dir.path().join("board.json"));

        let board = Board::starter();
        store.save(&board).expect("save succeeds");
        let loaded = store.load().expect("load succeeds").expect("board present");
        assert_eq!(loaded, board);
    }

    #[test]
    fn undecodable_file_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{not json").expect("write fixture");

        let store = JsonSnapshotStore::new(&path);
        let err = store.load().expect_err("corrupt file must fail");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
