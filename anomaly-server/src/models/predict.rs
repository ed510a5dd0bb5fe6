//! Scoring request and response bodies

use anomaly_core::{FeatureRow, ScoredResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PredictRequest {
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<FeatureRow>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PredictResponse {
    pub results: Vec<ScoredResult>,
}
