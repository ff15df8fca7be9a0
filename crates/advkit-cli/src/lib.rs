//! CLI crate: argument parsing, job files and command handlers.

pub mod cli;
pub mod handlers;
pub mod job;

pub use cli::{Cli, Commands};
pub use job::JobFile;
