// ABOUTME: Library root for berth - the container dashboard core.
// ABOUTME: The CLI binary is in main.rs.

pub mod actions;
pub mod config;
pub mod error;
pub mod exec;
pub mod gateway;
pub mod logs;
pub mod snapshot;
pub mod types;
