//! Common test utilities for client integration tests.

use phonebook_api::{Server, ServerConfig};
use phonebook_core::{DirectoryStore, MemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A real server bound to an ephemeral local port.
pub struct TestServer {
    /// Base URL of the running server
    pub url: String,
    /// The store behind the server, for out-of-band mutations
    pub store: Arc<dyn DirectoryStore>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Starts a server over the four sample contacts.
    pub async fn seeded() -> Self {
        Self::start(Arc::new(MemoryStore::with_sample_contacts())).await
    }

    /// Starts a server over `store`.
    pub async fn start(store: Arc<dyn DirectoryStore>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();

        let server = Server::with_store(ServerConfig::default(), store.clone());
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            url,
            store,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    /// Stops the server and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.unwrap();
        }
    }
}
