//! Pure board transformation engine.
//!
//! # Responsibility
//! - Compute new board values from a board plus an intent (reorders) or a
//!   draft (CRUD mutations).
//! - Reject invalid operations wholesale: on error the caller's board is
//!   returned unchanged.
//!
//! # Invariants
//! - No function in this module mutates its input board.
//! - Every `Ok` result satisfies all `Board::validate` invariants given a
//!   well-formed input board.

use crate::model::board::InvariantViolation;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod mutate;
pub mod reorder;

pub type BoardResult<T> = Result<T, BoardError>;

/// Local, recoverable errors returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A referenced task or column id does not exist.
    NotFound(String),
    /// A move references a nonexistent target column.
    InvalidTarget(String),
    /// Task creation was requested on a board with no columns.
    NoColumns,
    /// The operation would produce (or was given) a structurally invalid
    /// board.
    InvariantViolation(Vec<InvariantViolation>),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no such task or column: `{id}`"),
            Self::InvalidTarget(column_id) => {
                write!(f, "target column does not exist: `{column_id}`")
            }
            Self::NoColumns => write!(f, "board has no columns"),
            Self::InvariantViolation(violations) => {
                write!(f, "board invariants violated:")?;
                for violation in violations {
                    write!(f, " [{violation}]")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for BoardError {}
