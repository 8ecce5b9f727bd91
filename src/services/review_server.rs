//! HTTP server for the review roster API.
//!
//! Embeds an axum server bound to the configured address. Shutdown is driven
//! by a cancellation token so in-flight requests finish before the task exits.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::services::review_api::review_api_routes;
use axum::Router;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Shared state for the axum routes.
#[derive(Clone)]
pub struct ReviewState {
    pub db: DbPool,
}

/// Handle to control the running server.
pub struct ServerHandle {
    cancel_token: CancellationToken,
    local_addr: SocketAddr,
    join: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        log::info!("[server] Stopping server on {}", self.local_addr);
        self.cancel_token.cancel();

        if let Err(e) = self.join.await {
            log::error!("[server] Server task failed: {}", e);
        }
    }
}

/// Build the full router with request tracing.
pub fn router(db: DbPool) -> Router {
    review_api_routes()
        .with_state(ReviewState { db })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Bind `addr` and serve the API in a background task.
///
/// Returns an error if the address is unavailable.
pub async fn start_server(addr: SocketAddr, db: DbPool) -> Result<ServerHandle, AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read bound address: {}", e)))?;

    let cancel_token = CancellationToken::new();
    let cancel_clone = cancel_token.clone();
    let app = router(db);

    log::info!("[server] Listening on http://{}", local_addr);

    let join = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            cancel_clone.cancelled().await;
        });

        if let Err(e) = server.await {
            log::error!("[server] Server error: {}", e);
        }

        log::info!("[server] Server stopped");
    });

    Ok(ServerHandle {
        cancel_token,
        local_addr,
        join,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_start_and_shutdown_on_ephemeral_port() {
        let dir = tempdir().unwrap();
        let pool = db::initialize(&dir.path().join("server.db")).await.unwrap();

        let handle = start_server(SocketAddr::from(([127, 0, 0, 1], 0)), pool)
            .await
            .unwrap();
        assert_ne!(handle.local_addr().port(), 0);

        let stream = tokio::net::TcpStream::connect(handle.local_addr()).await;
        assert!(stream.is_ok());
        drop(stream);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_fails_on_taken_port() {
        let dir = tempdir().unwrap();
        let pool = db::initialize(&dir.path().join("server.db")).await.unwrap();

        let first = start_server(SocketAddr::from(([127, 0, 0, 1], 0)), pool.clone())
            .await
            .unwrap();
        let err = start_server(first.local_addr(), pool).await;
        assert!(matches!(err, Err(AppError::Internal { .. })));

        first.shutdown().await;
    }
}
