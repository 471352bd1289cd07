//! Store Invariant Tests
//!
//! Properties every `TodoStore` must hold:
//! - Ids are unique and never handed out twice
//! - Subtasks survive a round trip in order
//! - An empty patch changes nothing
//! - Repeating a patch is idempotent
//! - Deleted and never-issued ids are `NotFound`
//! - Concurrent writers on a file database all succeed; the last write wins

use std::collections::HashSet;

use serde_json::json;
use tempfile::TempDir;

use todo_api::todos::{
    InMemoryTodoStore, NewTodo, Priority, SqliteTodoStore, Subtask, TodoError, TodoPatch,
    TodoStore,
};

// =============================================================================
// Property Checks
// =============================================================================

async fn check_unique_ids<S: TodoStore>(store: &S) {
    let mut seen = Vec::new();
    for round in 0..5 {
        let todo = store.create(NewTodo::titled(format!("t{}", round))).await.unwrap();
        assert!(!seen.contains(&todo.id), "id {} reused", todo.id);
        seen.push(todo.id);
        if round % 2 == 0 {
            store.delete(todo.id).await.unwrap();
        }
    }
}

async fn check_subtask_round_trip<S: TodoStore>(store: &S) {
    let subtasks: Vec<Subtask> = serde_json::from_value(json!([
        {"title": "z", "done": true},
        {"title": "a", "tags": ["x", "y"], "estimate": 1.5},
        {"nested": {"deep": null}}
    ]))
    .unwrap();

    let created = store
        .create(NewTodo {
            subtasks: subtasks.clone(),
            ..NewTodo::titled("parent")
        })
        .await
        .unwrap();
    assert_eq!(created.subtasks, subtasks);
    assert_eq!(store.get(created.id).await.unwrap().subtasks, subtasks);

    let reversed: Vec<Subtask> = subtasks.iter().rev().cloned().collect();
    let updated = store
        .update(
            created.id,
            TodoPatch {
                subtasks: Some(reversed.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.subtasks, reversed);
    assert_eq!(store.get(created.id).await.unwrap().subtasks, reversed);
}

async fn check_empty_patch<S: TodoStore>(store: &S) {
    let created = store
        .create(NewTodo {
            priority: Priority::High,
            category: "Work".to_string(),
            ..NewTodo::titled("stable")
        })
        .await
        .unwrap();

    let updated = store.update(created.id, TodoPatch::default()).await.unwrap();
    assert_eq!(updated, created);
    assert_eq!(store.get(created.id).await.unwrap(), created);
}

async fn check_idempotent_patch<S: TodoStore>(store: &S) {
    let created = store.create(NewTodo::titled("before")).await.unwrap();
    let patch = TodoPatch::from_json(
        br#"{"title": "after", "completed": true, "priority": "Low", "due_date": "2030-01-01"}"#,
    )
    .unwrap();

    let once = store.update(created.id, patch.clone()).await.unwrap();
    let twice = store.update(created.id, patch).await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice.id, created.id);
}

async fn check_not_found<S: TodoStore>(store: &S) {
    let created = store.create(NewTodo::titled("doomed")).await.unwrap();
    store.delete(created.id).await.unwrap();

    let never_issued = created.id + 1000;
    for id in [created.id, never_issued] {
        assert!(matches!(store.get(id).await, Err(TodoError::NotFound)));
        assert!(matches!(
            store.update(id, TodoPatch::default()).await,
            Err(TodoError::NotFound)
        ));
        assert!(matches!(store.delete(id).await, Err(TodoError::NotFound)));
    }
}

async fn check_all<S: TodoStore>(store: S) {
    check_unique_ids(&store).await;
    check_subtask_round_trip(&store).await;
    check_empty_patch(&store).await;
    check_idempotent_patch(&store).await;
    check_not_found(&store).await;
}

// =============================================================================
// Per-Store Runs
// =============================================================================

#[tokio::test]
async fn test_sqlite_store_invariants() {
    check_all(SqliteTodoStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn test_memory_store_invariants() {
    check_all(InMemoryTodoStore::new()).await;
}

// =============================================================================
// Durability
// =============================================================================

/// Rows written through one pool are visible after reconnecting.
#[tokio::test]
async fn test_sqlite_file_persists_across_reconnect() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("todos.db").display());

    let created = {
        let store = SqliteTodoStore::connect(&url, 2).await.unwrap();
        let created = store
            .create(NewTodo {
                subtasks: serde_json::from_value(json!([{"step": "one"}])).unwrap(),
                ..NewTodo::titled("durable")
            })
            .await
            .unwrap();
        store.close().await;
        created
    };

    let store = SqliteTodoStore::connect(&url, 2).await.unwrap();
    assert_eq!(store.list().await.unwrap(), vec![created.clone()]);

    // Ids keep climbing after a reconnect
    let next = store.create(NewTodo::titled("next")).await.unwrap();
    assert!(next.id > created.id);
}

// =============================================================================
// Concurrency
// =============================================================================

/// Updates on distinct and shared ids race with inserts through a
/// multi-connection pool. None of them may fail.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_concurrent_writers_all_succeed() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("todos.db").display());
    let store = SqliteTodoStore::connect(&url, 5).await.unwrap();

    let mut ids = Vec::new();
    for n in 0..8 {
        ids.push(store.create(NewTodo::titled(format!("seed {}", n))).await.unwrap().id);
    }

    let mut tasks = Vec::new();
    for round in 0..200 {
        let update_store = store.clone();
        let id = ids[round % ids.len()];
        tasks.push(tokio::spawn(async move {
            let patch = TodoPatch {
                title: Some(format!("title {}", round)),
                ..Default::default()
            };
            update_store.update(id, patch).await.map(|_| ())
        }));

        let create_store = store.clone();
        tasks.push(tokio::spawn(async move {
            create_store
                .create(NewTodo::titled(format!("new {}", round)))
                .await
                .map(|_| ())
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let todos = store.list().await.unwrap();
    assert_eq!(todos.len(), 8 + 200);
    let unique: HashSet<_> = todos.iter().map(|t| t.id).collect();
    assert_eq!(unique.len(), todos.len());

    // Each seeded row holds one of the titles submitted for it
    for (slot, id) in ids.iter().enumerate() {
        let title = store.get(*id).await.unwrap().title;
        let submitted: Vec<String> = (0..200)
            .filter(|round| round % ids.len() == slot)
            .map(|round| format!("title {}", round))
            .collect();
        assert!(submitted.contains(&title), "todo {} ended as {:?}", id, title);
    }

    store.close().await;
}

/// Full-payload writers on one id leave exactly one writer's payload behind.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_same_id_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("todos.db").display());
    let store = SqliteTodoStore::connect(&url, 5).await.unwrap();
    let id = store.create(NewTodo::titled("contested")).await.unwrap().id;

    let payloads: Vec<_> = (0..50)
        .map(|n: usize| {
            let description = (n % 2 == 1).then(|| format!("d{}", n));
            let priority = ["Low", "Medium", "High"][n % 3];
            json!({
                "title": format!("writer {}", n),
                "description": description,
                "completed": n % 3 == 0,
                "priority": priority,
                "subtasks": [{"writer": n}],
            })
        })
        .collect();

    let mut tasks = Vec::new();
    for payload in &payloads {
        let store = store.clone();
        let patch = TodoPatch::from_json(payload.to_string().as_bytes()).unwrap();
        tasks.push(tokio::spawn(async move { store.update(id, patch).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let last = serde_json::to_value(store.get(id).await.unwrap()).unwrap();
    let matches_one = payloads.iter().any(|payload| {
        ["title", "description", "completed", "priority", "subtasks"]
            .iter()
            .all(|key| last[*key] == payload[*key])
    });
    assert!(matches_one, "final row mixes writers: {}", last);

    store.close().await;
}
