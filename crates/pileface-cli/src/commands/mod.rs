//! CLI command implementations.

pub mod devices;
pub mod flip;
