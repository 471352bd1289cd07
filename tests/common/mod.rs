//! Shared helpers for the integration tests.
//!
//! Each test file is compiled as its own crate, so helpers unused by one
//! file would otherwise warn there.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use todo_api::http_server::{HttpServer, HttpServerConfig};
use todo_api::todos::{InMemoryTodoStore, SqliteTodoStore};

/// Router over a fresh in-memory SQLite database
pub async fn sqlite_router() -> Router {
    sqlite_router_with(HttpServerConfig::default()).await
}

/// Same as [`sqlite_router`] with a custom server config
pub async fn sqlite_router_with(config: HttpServerConfig) -> Router {
    let store = SqliteTodoStore::in_memory().await.unwrap();
    HttpServer::new(config, Arc::new(store)).router()
}

/// Router over the lock-based in-memory store
pub fn memory_router() -> Router {
    HttpServer::new(
        HttpServerConfig::default(),
        Arc::new(InMemoryTodoStore::new()),
    )
    .router()
}

/// Response status plus raw body bytes
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

/// Send a request with a raw body
pub async fn send_raw(router: &Router, method: Method, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        body: body.to_vec(),
    }
}

/// Send a request with a JSON body, or none
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let body = body.map(|v| v.to_string()).unwrap_or_default();
    send_raw(router, method, uri, &body).await
}
