//! Common test utilities for the API integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use phonebook_api::{Server, ServerConfig};
use phonebook_core::{DirectoryStore, MemoryStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Test harness wrapping an in-process router and its store.
pub struct TestHarness {
    /// The assembled application
    pub app: Router,
    /// The store behind it, for out-of-band checks
    pub store: Arc<dyn DirectoryStore>,
}

impl TestHarness {
    /// A harness over the four sample contacts.
    pub fn seeded() -> Self {
        Self::with_store(Arc::new(MemoryStore::with_sample_contacts()))
    }

    /// A harness over a caller-supplied store.
    pub fn with_store(store: Arc<dyn DirectoryStore>) -> Self {
        Self::with_config(ServerConfig::default(), store)
    }

    /// A harness with a custom configuration.
    pub fn with_config(config: ServerConfig, store: Arc<dyn DirectoryStore>) -> Self {
        let app = Server::with_store(config, store.clone()).app();
        Self { app, store }
    }

    /// Sends a request and returns status plus raw body.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// GET and parse JSON (Null for an empty body).
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(req).await;
        (status, parse(&body))
    }

    /// Sends a JSON body with the given method.
    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send(req).await;
        (status, parse(&body))
    }

    /// DELETE and return the status.
    pub async fn delete(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }
}

fn parse(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
    }
}
