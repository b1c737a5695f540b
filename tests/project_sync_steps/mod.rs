//! Step definitions for project sync behaviour tests.

mod given;
mod then;
mod when;
pub mod world;
