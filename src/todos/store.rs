//! # Todo Store
//!
//! Persistence access for todos. The HTTP layer only ever talks to this
//! trait, one call per request.

use std::future::Future;

use super::errors::TodoResult;
use super::model::{NewTodo, Todo, TodoId, TodoPatch};

/// Store trait for todo operations
pub trait TodoStore: Send + Sync + 'static {
    /// Insert a todo under a fresh, never reused id
    fn create(&self, new: NewTodo) -> impl Future<Output = TodoResult<Todo>> + Send;

    /// All stored todos, in id order
    fn list(&self) -> impl Future<Output = TodoResult<Vec<Todo>>> + Send;

    /// Fetch one todo
    fn get(&self, id: TodoId) -> impl Future<Output = TodoResult<Todo>> + Send;

    /// Merge a patch into an existing todo and return the result
    fn update(
        &self,
        id: TodoId,
        patch: TodoPatch,
    ) -> impl Future<Output = TodoResult<Todo>> + Send;

    /// Permanently remove a todo
    fn delete(&self, id: TodoId) -> impl Future<Output = TodoResult<()>> + Send;
}
