mod middleware;
mod public;

pub use public::{HttpState, build_router};

use axum::Router;
use tracing::info;

use crate::config::ServerSettings;

use super::error::InfraError;

/// Bind the public listener and serve until interrupted.
pub async fn serve(settings: &ServerSettings, router: Router) -> Result<(), InfraError> {
    let addr = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target = "brezza::http", addr = %addr, "public listener started");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!(
            target = "brezza::http",
            "failed to install interrupt handler; serving until killed"
        );
        std::future::pending::<()>().await;
    }
    info!(target = "brezza::http", "shutdown signal received");
}
