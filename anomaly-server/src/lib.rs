//! Login Anomaly Scoring - Server and Trainer
//!
//! Two binaries share this library:
//!
//! ```text
//! ┌───────────────────────────┐        ┌───────────────────────────┐
//! │       anomaly-train       │        │      anomaly-server       │
//! │  PostgreSQL ─▶ fit ─▶ save│ model  │ load once ─▶ POST /predict│
//! │  (sqlx, one-shot)         │ ─────▶ │ (axum, stateless)         │
//! └───────────────────────────┘  .json └───────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod dsn;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use anomaly_core::Scorer;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub scorer: Arc<Scorer>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

/// Initialize logging to stderr, `RUST_LOG` overriding `default_filter`
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
