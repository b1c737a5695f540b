//! Port contracts for the local task store.
//!
//! Ports define infrastructure-agnostic interfaces used by the sync engine.

pub mod repository;

pub use repository::{
    BoardRepository, BoardRepositoryError, BoardRepositoryResult, TaskRepository,
    TaskRepositoryError, TaskRepositoryResult,
};
