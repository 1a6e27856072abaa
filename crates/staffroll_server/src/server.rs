//! # HTTP Server
//!
//! Binds the configured address and serves the employee router until ctrl-c.

use crate::config::ServerConfig;
use crate::routes::employee_routes;
use crate::state::AppState;
use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    employee_routes(state)
}

/// Serve until the process receives ctrl-c.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "event=server_start module=api status=ok addr={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=api status=error error={err}");
    }
}
