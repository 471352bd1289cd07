//! CLI module for the todo API
//!
//! Provides command-line interface for:
//! - serve: Boot logging, the store and the HTTP server
//! - migrate: Create the todos table and exit

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{migrate, run, run_command, serve};
pub use config::{Config, StorageBackend, StorageConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
