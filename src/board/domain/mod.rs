//! Domain model for local boards and tasks.
//!
//! Boards group tasks; tasks optionally carry remote metadata when they were
//! pulled from an external project. Infrastructure concerns stay outside of
//! the domain boundary.

mod board;
mod error;
mod ids;
mod remote;
mod status;
mod task;

pub use board::{Board, BoardName};
pub use error::{BoardDomainError, ParseTaskStatusError};
pub use ids::{BoardId, TaskId};
pub use remote::RemoteTaskMetadata;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, RemoteRevision, Task, TaskContent};
