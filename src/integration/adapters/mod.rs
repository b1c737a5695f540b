//! Adapter implementations for integration ports.

pub mod azure_devops;
pub mod github;
pub mod memory;
pub mod postgres;
