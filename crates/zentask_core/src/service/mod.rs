//! Core use-case services.
//!
//! # Responsibility
//! - Apply task lifecycle rules on top of repository persistence.
//! - Keep shells decoupled from storage details.

pub mod task_store;
