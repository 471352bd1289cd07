//! Configuration file handling
//!
//! The config file is a single JSON object. Every field is optional:
//!
//! ```json
//! {
//!   "server":  { "host": "0.0.0.0", "port": 8000, "cors_origins": [] },
//!   "storage": { "backend": "sqlite", "database_url": "sqlite://todos.db", "max_connections": 5 },
//!   "logging": { "filter": "todo_api=info,tower_http=info", "format": "pretty" },
//!   "worker_threads": null
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::args::ServeArgs;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::LogConfig;

/// Where todos are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite URL (default: "sqlite://todos.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Pool size (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://todos.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LogConfig,

    /// Tokio worker threads (default: logical CPU count)
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Config {
    /// Load from `path`, or defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `serve` flags on top of the file values
    pub fn apply_overrides(&mut self, args: &ServeArgs) {
        if let Some(host) = &args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(url) = &args.database_url {
            self.storage.database_url = url.clone();
        }
        if args.memory {
            self.storage.backend = StorageBackend::Memory;
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        if self.server.max_body_bytes == 0 {
            return Err(CliError::config_error("server.max_body_bytes must be > 0"));
        }

        if self.storage.max_connections == 0 {
            return Err(CliError::config_error("storage.max_connections must be > 0"));
        }

        if self.storage.backend == StorageBackend::Sqlite
            && self.storage.database_url.trim().is_empty()
        {
            return Err(CliError::config_error(
                "storage.database_url is required for the sqlite backend",
            ));
        }

        if self.worker_threads == Some(0) {
            return Err(CliError::config_error("worker_threads must be > 0"));
        }

        Ok(())
    }
}
