//! Login Anomaly Scoring Server
//!
//! Loads the model artifact once, then serves `POST /predict`.
//! A missing or invalid artifact stops the process before it binds.

use std::net::SocketAddr;
use std::sync::Arc;

use anomaly_core::Scorer;
use anomaly_server::{
    config::{ServerConfig, DEFAULT_LOG_FILTER},
    create_router, init_tracing, AppState,
};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    // Initialize logging
    init_tracing(DEFAULT_LOG_FILTER, config.log_json);

    tracing::info!("Login anomaly scoring server starting...");

    let scorer = Scorer::load(&config.model_path).with_context(|| {
        format!("failed to load model artifact from {}", config.model_path.display())
    })?;

    // Build application state
    let state = AppState {
        scorer: Arc::new(scorer),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
