//! Board synchronization between the in-memory copy and a remote store.
//!
//! # Responsibility
//! - Define the pluggable `BoardStore` persistence contract.
//! - Orchestrate load-on-start and save-on-commit with last-write-wins
//!   semantics.
//!
//! # Invariants
//! - A remote-store failure is never fatal to the session.
//! - The in-memory board is updated before any persistence attempt.

pub mod controller;
pub mod store;
