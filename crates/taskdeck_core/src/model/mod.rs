//! Board-centric domain model.
//!
//! # Responsibility
//! - Define the canonical board/column/task structures used by core logic.
//! - Keep one wire-stable shape shared by every store implementation.
//!
//! # Invariants
//! - Ordering inside `task_ids` and `column_order` is the only source of
//!   display order; no other ordering field exists.
//! - Every task belongs to exactly one column once created.

pub mod board;
