//! CLI module for volley - argument parsing and the two command handlers.

pub mod commands;
pub mod handlers;

pub use commands::{Cli, CommandStatus, Mode};
