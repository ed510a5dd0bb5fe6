//! Model Artifact - the single file handed from trainer to scorer
//!
//! Written once by the trainer, read once by the scorer at startup.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forest::IsolationForest;
use super::scaler::StandardScaler;
use crate::error::{ModelError, ModelResult};
use crate::features::{LayoutInfo, FEATURE_COUNT};

/// Version tag used when the artifact does not carry one
pub const DEFAULT_MODEL_VERSION: &str = "if_v1";

/// On-disk format revision of the artifact file itself
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

/// Facts about the fit, kept for operators reading the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub dropped_rows: usize,
    pub percentile: f64,
    pub n_estimators: usize,
    pub contamination: f64,
    pub seed: u64,
    /// Training rows below the contamination offset
    pub contamination_flagged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    #[serde(default = "default_model_version")]
    pub version: String,

    pub feature_layout: LayoutInfo,
    pub scaler: StandardScaler,
    pub model: IsolationForest,
    pub threshold: f64,

    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub training: Option<TrainingSummary>,
}

impl ModelArtifact {
    /// Reject anything the scorer could not apply safely
    pub fn validate(&self) -> ModelResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedFormat(self.format_version));
        }

        self.feature_layout.validate()?;

        if self.scaler.n_features() != FEATURE_COUNT || self.scaler.scale.len() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: self.scaler.n_features(),
            });
        }
        if self.scaler.mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::InvalidArtifact("scaler has a non-finite mean".to_string()));
        }
        if self.scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ModelError::InvalidArtifact("scaler has a zero or non-finite scale".to_string()));
        }
        if self.model.n_features != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: self.model.n_features,
            });
        }
        self.model.validate().map_err(ModelError::InvalidArtifact)?;

        if !self.threshold.is_finite() {
            return Err(ModelError::InvalidArtifact("threshold is not finite".to_string()));
        }

        Ok(())
    }

    /// Save to disk.
    ///
    /// Writes a sibling `.tmp` file and renames it over `path`. An artifact
    /// that would not load back is refused before anything is written.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;

        tracing::info!(path = %path.display(), version = %self.version, "Model artifact saved");
        Ok(())
    }

    /// Load from disk with validation
    pub fn load(path: &Path) -> ModelResult<Self> {
        let file = fs::File::open(path)?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))?;
        artifact.validate()?;
        Ok(artifact)
    }
}
