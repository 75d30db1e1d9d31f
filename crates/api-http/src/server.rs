//! HTTP Server

use crate::handler::{add_person, get_queue_list, not_found};
use axum::routing::{get, post};
use axum::Router;
use queuedesk_core::application::QueueService;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Listener configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

/// Routes plus request tracing
pub fn build_router(service: Arc<QueueService>) -> Router {
    Router::new()
        .route("/person", post(add_person))
        .route("/list", get(get_queue_list))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, service: Arc<QueueService>) -> Self {
        Self {
            config,
            router: build_router(service),
        }
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr: SocketAddr = listener.local_addr()?;

        info!(%addr, "Server is running");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
