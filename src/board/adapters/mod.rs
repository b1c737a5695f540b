//! Adapter implementations for board and task repository ports.

pub mod memory;
pub mod postgres;
