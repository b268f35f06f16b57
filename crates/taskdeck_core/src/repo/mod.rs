//! Board store implementations.
//!
//! # Responsibility
//! - Implement the `BoardStore` contract against concrete media: a SQLite
//!   database and a single-file JSON snapshot.
//! - Keep SQL and filesystem details out of the sync layer.
//!
//! # Invariants
//! - Saves replace the whole persisted board; there are no partial writes.
//! - Load paths reject undecodable persisted state instead of masking it.

pub mod board_repo;
pub mod snapshot_repo;
