//! Batch Scorer - applies a loaded artifact to incoming feature rows
//!
//! The artifact is loaded once and never mutated, so a `Scorer` can be
//! shared across request handlers behind an `Arc` without locking.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::ModelArtifact;
use super::threshold::classify;
use crate::error::ModelResult;
use crate::features::{stack_rows, FeatureRow};

/// Per-event scoring output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub event_id: i64,
    pub model_version: String,
    /// Higher = more anomalous
    pub score: f64,
    pub threshold: f64,
    pub predicted: u8,
}

#[derive(Debug)]
pub struct Scorer {
    artifact: ModelArtifact,
    loaded_at: DateTime<Utc>,
}

impl Scorer {
    pub fn new(artifact: ModelArtifact) -> ModelResult<Self> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            loaded_at: Utc::now(),
        })
    }

    /// Load and validate the artifact at `path`
    pub fn load(path: &Path) -> ModelResult<Self> {
        tracing::info!(path = %path.display(), "Loading model artifact");

        let scorer = Self::new(ModelArtifact::load(path)?)?;

        tracing::info!(
            version = %scorer.version(),
            threshold = scorer.threshold(),
            trees = scorer.artifact.model.trees.len(),
            "Model artifact loaded"
        );
        Ok(scorer)
    }

    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    pub fn threshold(&self) -> f64 {
        self.artifact.threshold
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Score a batch; one result per row, in input order.
    ///
    /// The batch is scored as one matrix, so any failure fails all rows.
    pub fn score_batch(&self, rows: &[FeatureRow]) -> ModelResult<Vec<ScoredResult>> {
        let vectors: Vec<_> = rows.iter().map(FeatureRow::to_vector).collect();
        let x = stack_rows(&vectors);
        let xs = self.artifact.scaler.transform(&x)?;
        let scores = self.artifact.model.anomaly_scores(&xs)?;

        let threshold = self.artifact.threshold;
        Ok(rows
            .iter()
            .zip(scores.iter())
            .map(|(row, &score)| ScoredResult {
                event_id: row.event_id,
                model_version: self.artifact.version.clone(),
                score,
                threshold,
                predicted: classify(score, threshold),
            })
            .collect())
    }
}
