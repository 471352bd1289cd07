//! # SQLite Todo Store
//!
//! `sqlx`-backed store over a single `todos` table.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS todos (
//!     id          INTEGER PRIMARY KEY AUTOINCREMENT,
//!     title       VARCHAR(200) NOT NULL,
//!     description TEXT,
//!     completed   BOOLEAN NOT NULL DEFAULT 0,
//!     category    VARCHAR(100) NOT NULL DEFAULT 'General',
//!     priority    VARCHAR(10) NOT NULL DEFAULT 'Medium'
//!                 CHECK (priority IN ('Low', 'Medium', 'High')),
//!     due_date    DATE,
//!     subtasks    TEXT NOT NULL DEFAULT '[]'
//! );
//! ```
//!
//! `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
//! again. Subtasks go through sqlx's `Json` codec.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;

use super::errors::{TodoError, TodoResult};
use super::model::{NewTodo, Priority, Subtask, Todo, TodoId, TodoPatch};
use super::store::TodoStore;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       VARCHAR(200) NOT NULL,
    description TEXT,
    completed   BOOLEAN NOT NULL DEFAULT 0,
    category    VARCHAR(100) NOT NULL DEFAULT 'General',
    priority    VARCHAR(10) NOT NULL DEFAULT 'Medium'
                CHECK (priority IN ('Low', 'Medium', 'High')),
    due_date    DATE,
    subtasks    TEXT NOT NULL DEFAULT '[]'
)";

const COLUMNS: &str =
    "id, title, description, completed, category, priority, due_date, subtasks";

/// Raw `todos` row
#[derive(Debug, FromRow)]
struct TodoRow {
    id: i64,
    title: String,
    description: Option<String>,
    completed: bool,
    category: String,
    priority: String,
    due_date: Option<NaiveDate>,
    subtasks: Json<Vec<Subtask>>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = Priority::from_str(&row.priority).map_err(|_| {
            TodoError::Internal(format!(
                "todo {} has invalid stored priority '{}'",
                row.id, row.priority
            ))
        })?;

        Ok(Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            category: row.category,
            priority,
            due_date: row.due_date,
            subtasks: row.subtasks.0,
        })
    }
}

/// SQLite todo store
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    /// Connect to `database_url`, creating the file if needed, and apply the schema
    pub async fn connect(database_url: &str, max_connections: u32) -> TodoResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(database_url, "sqlite store ready");
        Ok(store)
    }

    /// Private in-memory database, pinned to one connection so it outlives idle reaping
    pub async fn in_memory() -> TodoResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the `todos` table if it does not exist
    pub async fn migrate(&self) -> TodoResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch(&self, id: TodoId) -> TodoResult<Todo> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {} FROM todos WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TodoError::NotFound)?;
        Todo::try_from(row)
    }
}

impl TodoStore for SqliteTodoStore {
    async fn create(&self, new: NewTodo) -> TodoResult<Todo> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "INSERT INTO todos (title, description, completed, category, priority, due_date, subtasks) \
             VALUES (?, ?, 0, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(new.priority.as_str())
        .bind(new.due_date)
        .bind(Json(&new.subtasks))
        .fetch_one(&self.pool)
        .await?;

        let todo = Todo::try_from(row)?;
        tracing::debug!(id = todo.id, "inserted todo row");
        Ok(todo)
    }

    async fn list(&self) -> TodoResult<Vec<Todo>> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {} FROM todos ORDER BY id",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = rows.len(), "listed todo rows");
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn get(&self, id: TodoId) -> TodoResult<Todo> {
        self.fetch(id).await
    }

    /// Merges the patch inside one `UPDATE ... RETURNING` statement.
    ///
    /// Absent fields bind `NULL` and fall back to the stored column. The
    /// nullable columns carry an extra presence flag so an explicit `null`
    /// clears them.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> TodoResult<Todo> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "UPDATE todos SET \
                 title = COALESCE(?, title), \
                 description = CASE WHEN ? THEN ? ELSE description END, \
                 completed = COALESCE(?, completed), \
                 category = COALESCE(?, category), \
                 priority = COALESCE(?, priority), \
                 due_date = CASE WHEN ? THEN ? ELSE due_date END, \
                 subtasks = COALESCE(?, subtasks) \
             WHERE id = ? RETURNING {}",
            COLUMNS
        ))
        .bind(patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.completed)
        .bind(patch.category)
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .bind(patch.subtasks.map(Json))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TodoError::NotFound)?;

        tracing::debug!(id, "updated todo row");
        Todo::try_from(row)
    }

    async fn delete(&self, id: TodoId) -> TodoResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        tracing::debug!(id, "deleted todo row");
        Ok(())
    }
}
