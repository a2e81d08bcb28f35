//! HTTP adapter over the race coordinator.
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /?cep=<code>` | 200 winner, 400 missing `cep`, 500 first answer failed, 504 deadline |
//! | `GET /health` | 200 `ok`, no upstream calls |

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use cepfetch_core::RaceCoordinator;

use crate::error::ServerError;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RaceCoordinator>,
}

impl AppState {
    pub fn new(coordinator: RaceCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(coordinator: RaceCoordinator, addr: SocketAddr) -> Result<(), ServerError> {
    let app = create_router(AppState::new(coordinator));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
