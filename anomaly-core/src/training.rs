//! Training pipeline - rows in, artifact out
//!
//! Database access lives in the trainer binary; this module only sees rows,
//! so the whole fit can be exercised without PostgreSQL.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::features::{stack_rows, LayoutInfo, TrainingRow};
use crate::model::artifact::{ModelArtifact, TrainingSummary, ARTIFACT_FORMAT_VERSION, DEFAULT_MODEL_VERSION};
use crate::model::forest::{ForestParams, IsolationForest};
use crate::model::scaler::StandardScaler;
use crate::model::threshold::{percentile, DEFAULT_PERCENTILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub forest: ForestParams,

    /// Percentile of training anomaly scores used as the threshold
    pub threshold_percentile: f64,

    /// Version tag written into the artifact
    pub version: String,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            threshold_percentile: DEFAULT_PERCENTILE,
            version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

/// Fit scaler, forest and threshold on the complete rows of `rows`.
///
/// Rows with any NULL or non-finite feature are dropped. Fails with
/// [`ModelError::EmptyTrainingSet`] if nothing is left.
pub fn train(rows: &[TrainingRow], params: &TrainingParams) -> ModelResult<ModelArtifact> {
    let vectors: Vec<_> = rows.iter().filter_map(TrainingRow::complete).collect();
    let dropped_rows = rows.len() - vectors.len();

    if vectors.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if dropped_rows > 0 {
        tracing::info!(dropped_rows, "Dropped feature rows with missing or non-finite values");
    }

    let x = stack_rows(&vectors);
    let scaler = StandardScaler::fit(&x)?;
    let xs = scaler.transform(&x)?;

    let model = IsolationForest::fit(&xs, params.forest.clone())?;
    let scores = model.anomaly_scores(&xs)?;
    let threshold = percentile(&scores.to_vec(), params.threshold_percentile)?;
    let contamination_flagged = model
        .decision_function(&xs)?
        .iter()
        .filter(|&&d| d < 0.0)
        .count();

    tracing::info!(
        rows = vectors.len(),
        threshold,
        percentile = params.threshold_percentile,
        contamination_flagged,
        "Model fitted"
    );

    let summary = TrainingSummary {
        rows: vectors.len(),
        dropped_rows,
        percentile: params.threshold_percentile,
        n_estimators: model.params.n_estimators,
        contamination: model.params.contamination,
        seed: model.params.seed,
        contamination_flagged,
    };

    Ok(ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        version: params.version.clone(),
        feature_layout: LayoutInfo::current(),
        scaler,
        model,
        threshold,
        trained_at: Some(Utc::now()),
        training: Some(summary),
    })
}
