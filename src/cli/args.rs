//! CLI argument definitions using clap
//!
//! Commands:
//! - todo-api serve [--config <path>] [--host <host>] [--port <port>] [--database-url <url>] [--memory]
//! - todo-api migrate [--config <path>] [--database-url <url>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// todo-api - A minimal HTTP CRUD API for todo items
#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        overrides: ServeArgs,
    },

    /// Create the todos table and exit
    Migrate {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Database URL, overriding the config file
        #[arg(long)]
        database_url: Option<String>,
    },
}

/// Options for `serve`; each flag overrides the matching config value
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Keep todos in memory instead of a database
    #[arg(long)]
    pub memory: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
