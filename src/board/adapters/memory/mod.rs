//! In-memory adapters for boards and tasks.

mod board;
mod task;

pub use board::InMemoryBoardRepository;
pub use task::InMemoryTaskRepository;
