//! Scoring handler

use axum::{extract::State, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{PredictRequest, PredictResponse};

/// Score a batch of login feature rows
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    req.validate()?;

    let results = state.scorer.score_batch(&req.items)?;

    tracing::debug!(
        items = results.len(),
        flagged = results.iter().filter(|r| r.predicted == 1).count(),
        "Scored login batch"
    );

    Ok(Json(PredictResponse { results }))
}
