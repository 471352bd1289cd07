//! # Todos
//!
//! The todo record, its create/patch payloads, and the stores that
//! persist it.

pub mod errors;
pub mod in_memory;
pub mod model;
pub mod sqlite;
pub mod store;

pub use errors::{ErrorResponse, TodoError, TodoResult};
pub use in_memory::InMemoryTodoStore;
pub use model::{NewTodo, Priority, Subtask, Todo, TodoId, TodoPatch};
pub use sqlite::SqliteTodoStore;
pub use store::TodoStore;
