//! CLI command implementations
//!
//! Boot order for `serve`: configuration, logging, tokio runtime, store,
//! HTTP server. `migrate` stops after the store has applied its schema.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::todos::{InMemoryTodoStore, SqliteTodoStore};

use super::args::{Cli, Command};
use super::config::{Config, StorageBackend, StorageConfig};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command to completion
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { overrides } => {
            let mut config = Config::load_or_default(overrides.config.as_deref())?;
            config.apply_overrides(&overrides);
            config.validate()?;

            boot_logging(&config)?;
            build_runtime(config.worker_threads)?.block_on(serve(config))
        }
        Command::Migrate {
            config,
            database_url,
        } => {
            let mut config = Config::load_or_default(config.as_deref())?;
            if let Some(url) = database_url {
                config.storage.database_url = url;
            }
            config.validate()?;

            boot_logging(&config)?;
            build_runtime(config.worker_threads)?.block_on(migrate(&config.storage))
        }
    }
}

fn boot_logging(config: &Config) -> CliResult<()> {
    init_logging(&config.logging)
        .map_err(|e| CliError::config_error(format!("Failed to initialize logging: {}", e)))
}

fn build_runtime(worker_threads: Option<usize>) -> CliResult<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }
    builder
        .build()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Open the configured store and serve HTTP until shutdown
pub async fn serve(config: Config) -> CliResult<()> {
    tracing::info!(
        backend = ?config.storage.backend,
        addr = %config.server.socket_addr(),
        "starting todo API"
    );

    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("in-memory storage selected; todos are lost on exit");
            let store = Arc::new(InMemoryTodoStore::new());
            HttpServer::new(config.server, store).start().await?;
        }
        StorageBackend::Sqlite => {
            let store = Arc::new(
                SqliteTodoStore::connect(
                    &config.storage.database_url,
                    config.storage.max_connections,
                )
                .await?,
            );
            HttpServer::new(config.server, Arc::clone(&store))
                .start()
                .await?;
            store.close().await;
        }
    }

    Ok(())
}

/// Apply the table schema to the configured database
pub async fn migrate(storage: &StorageConfig) -> CliResult<()> {
    if storage.backend != StorageBackend::Sqlite {
        return Err(CliError::config_error(
            "migrate requires the sqlite storage backend",
        ));
    }

    let store = SqliteTodoStore::connect(&storage.database_url, 1).await?;
    store.close().await;
    tracing::info!(database_url = %storage.database_url, "schema applied");
    Ok(())
}
