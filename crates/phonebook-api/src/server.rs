//! API server implementation

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use phonebook_core::DirectoryStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::Result;
use crate::config::ServerConfig;
use crate::middleware::RequestLogLayer;
use crate::routes;
use crate::state::{AppState, open_store};

/// Phonebook API server
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server, opening the store named by `config`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = open_store(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server over an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The full application: routes, fallback, CORS, and request logging.
    pub fn app(&self) -> Router {
        let router = routes::router();
        let router = match &self.config.static_dir {
            Some(dir) => {
                log::info!("Serving static files from {}", dir.display());
                router.fallback_service(ServeDir::new(dir))
            }
            None => router.fallback(routes::unknown_endpoint),
        };

        router
            .with_state(self.state.clone())
            .layer(RequestLogLayer::new())
            // Outermost: also covers the log layer's own 413
            .layer(CorsLayer::permissive())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        tracing::info!(
            addr = %local,
            store = self.state.store().name(),
            "Server running on port {}",
            local.port()
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
