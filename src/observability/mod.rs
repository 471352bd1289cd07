//! Observability for the todo API
//!
//! Structured logging through `tracing`. HTTP request spans come from
//! `tower_http::trace::TraceLayer` in the server; this module only owns
//! subscriber setup.

mod logger;

pub use logger::{init_logging, LogConfig, LogFormat};
