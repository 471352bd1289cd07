//! Todo HTTP Routes
//!
//! | Path           | Method | Result                              |
//! |----------------|--------|-------------------------------------|
//! | `/todos/`      | GET    | 200, every todo                     |
//! | `/todos/`      | POST   | 200, the created todo               |
//! | `/todos/{id}/` | PUT    | 200, the updated todo, or 404       |
//! | `/todos/{id}/` | DELETE | 204 `{"message": "Todo deleted"}`   |
//!
//! Any other verb gets 405. On `/todos/{id}/` the id is resolved first, so
//! an unknown id answers 404 whatever the verb. Only plain decimal ids
//! resolve. Bodies over the configured limit get a JSON 413.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;

use crate::todos::{NewTodo, Todo, TodoError, TodoId, TodoPatch, TodoResult, TodoStore};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create todo routes backed by `store`
pub fn todo_routes<S: TodoStore>(store: Arc<S>) -> Router {
    Router::new()
        .route(
            "/todos/",
            get(list_todos::<S>)
                .post(create_todo::<S>)
                .fallback(method_not_allowed),
        )
        .route("/todos/:id/", any(todo_detail::<S>))
        .with_state(store)
}

async fn list_todos<S: TodoStore>(State(store): State<Arc<S>>) -> TodoResult<Json<Vec<Todo>>> {
    Ok(Json(store.list().await?))
}

async fn create_todo<S: TodoStore>(
    State(store): State<Arc<S>>,
    body: Result<Bytes, BytesRejection>,
) -> TodoResult<Json<Todo>> {
    let new = NewTodo::from_json(&body?)?;
    let todo = store.create(new).await?;
    tracing::info!(id = todo.id, "todo created");
    Ok(Json(todo))
}

async fn todo_detail<S: TodoStore>(
    State(store): State<Arc<S>>,
    method: Method,
    Path(raw_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> TodoResult<Response> {
    let id = parse_id(&raw_id).ok_or(TodoError::NotFound)?;
    store.get(id).await?;

    match method {
        Method::PUT => {
            let patch = TodoPatch::from_json(&body?)?;
            let todo = store.update(id, patch).await?;
            tracing::info!(id, "todo updated");
            Ok(Json(todo).into_response())
        }
        Method::DELETE => {
            store.delete(id).await?;
            tracing::info!(id, "todo deleted");
            let body = MessageResponse {
                message: "Todo deleted".to_string(),
            };
            Ok((StatusCode::NO_CONTENT, Json(body)).into_response())
        }
        _ => Err(TodoError::MethodNotAllowed),
    }
}

async fn method_not_allowed() -> TodoError {
    TodoError::MethodNotAllowed
}

/// Decimal digits only; signs, whitespace and overflow never match a row
fn parse_id(raw: &str) -> Option<TodoId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
