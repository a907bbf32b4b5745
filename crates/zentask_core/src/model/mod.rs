//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical `Task` record shared by store, scanner and shell.
//! - Provide pure derived views (overdue, filtering) over tasks.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is permanent; there are no tombstones.

pub mod filter;
pub mod overdue;
pub mod task;
