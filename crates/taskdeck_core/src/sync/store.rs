//! Remote store contract consumed by the sync controller.

use crate::model::board::Board;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure. The controller recovers from every variant; stores
/// report, they never abort a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing medium could not be reached or refused the operation.
    Unavailable { reason: String },
    /// The backing medium answered, but its contents cannot be decoded into
    /// a board.
    Corrupt { reason: String },
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
            Self::Corrupt { reason } => write!(f, "persisted board is corrupt: {reason}"),
        }
    }
}

impl Error for StoreError {}

/// Opaque persistence backend for whole-board state.
///
/// Implementations persist and return the board wholesale; partial updates
/// and merging are out of contract. `load` returns `Ok(None)` when no board
/// has ever been saved.
///
/// `Send + Sync` because the controller issues saves from background
/// workers.
pub trait BoardStore: Send + Sync {
    fn load(&self) -> StoreResult<Option<Board>>;
    fn save(&self, board: &Board) -> StoreResult<()>;
}
