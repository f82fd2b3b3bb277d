//! CLI command implementations.

pub mod common;
pub mod config;
pub mod frames;
pub mod process;
