//! # Todo HTTP Server Module
//!
//! Combines the service and todo routers into one Axum server.
//!
//! # Endpoints
//!
//! - `/` - Welcome message
//! - `/health` - Health check
//! - `/todos/` - List and create todos
//! - `/todos/{id}/` - Update and delete a todo

pub mod config;
pub mod server;
pub mod service_routes;
pub mod todo_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
