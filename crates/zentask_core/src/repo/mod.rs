//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the load/save contract the task store persists through.
//! - Isolate SQLite details from lifecycle and alarm logic.
//!
//! # Invariants
//! - Every save writes the entire collection.

pub mod task_repo;
