//! `PostgreSQL` adapters for board and task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardRepository, PostgresTaskRepository};
