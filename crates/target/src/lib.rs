// Reference CRUD Target
//
// A small in-memory service exposing the `/users` surface the benchmark
// drives. It is used by `crudbench serve` and by the integration tests.

pub mod api;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use api::{ApiError, AppState};
pub use store::{User, UserStore};

/// Router over a fresh, empty store
pub fn router() -> Router {
    router_with_store(Arc::new(UserStore::new()))
}

pub fn router_with_store(store: Arc<UserStore>) -> Router {
    api::routes(AppState::new(store)).layer(TraceLayer::new_for_http())
}

/// Serve on an already bound listener until the future is dropped
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("CRUD target listening on http://{}", addr);
    }
    axum::serve(listener, router()).await
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve_until_shutdown(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("CRUD target listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
}
