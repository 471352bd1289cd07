//! todo-api - A minimal HTTP CRUD API for todo items
//!
//! Todos are created, listed, updated and deleted over JSON/HTTP and kept
//! in a single SQLite table.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod todos;
