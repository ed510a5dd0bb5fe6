//! Health check handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_version: String,
    pub threshold: f64,
    pub model_loaded_at: i64,
    pub timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_version: state.scorer.version().to_string(),
        threshold: state.scorer.threshold(),
        model_loaded_at: state.scorer.loaded_at().timestamp(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
