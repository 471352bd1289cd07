//! # In-Memory Todo Store
//!
//! Process-local store used for tests and throwaway runs (`--memory`).
//! Nothing survives a restart.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::errors::{TodoError, TodoResult};
use super::model::{NewTodo, Todo, TodoId, TodoPatch};
use super::store::TodoStore;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<TodoId, Todo>,
    /// Last id handed out; never decremented so deleted ids stay retired
    last_id: TodoId,
}

/// In-memory todo store
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    table: RwLock<Table>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<T>(_: T) -> TodoError {
        TodoError::Internal("Lock poisoned".to_string())
    }
}

impl TodoStore for InMemoryTodoStore {
    async fn create(&self, new: NewTodo) -> TodoResult<Todo> {
        let mut table = self.table.write().map_err(Self::poisoned)?;
        table.last_id += 1;
        let todo = Todo::new(table.last_id, new);
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn list(&self) -> TodoResult<Vec<Todo>> {
        let table = self.table.read().map_err(Self::poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: TodoId) -> TodoResult<Todo> {
        let table = self.table.read().map_err(Self::poisoned)?;
        table.rows.get(&id).cloned().ok_or(TodoError::NotFound)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> TodoResult<Todo> {
        let mut table = self.table.write().map_err(Self::poisoned)?;
        let todo = table.rows.get_mut(&id).ok_or(TodoError::NotFound)?;
        patch.apply(todo);
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> TodoResult<()> {
        let mut table = self.table.write().map_err(Self::poisoned)?;
        table.rows.remove(&id).map(|_| ()).ok_or(TodoError::NotFound)
    }
}
