//! Error types for model fitting, persistence and scoring

use thiserror::Error;

use crate::features::layout::LayoutMismatchError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no complete feature rows to train on")]
    EmptyTrainingSet,

    #[error("expected {expected} feature columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("unsupported artifact format version {0}")]
    UnsupportedFormat(u32),

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("cannot compute percentile of an empty score set")]
    EmptyScores,
}
