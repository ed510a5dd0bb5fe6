//! Model Module - scaler, isolation forest, threshold and artifact
//!
//! Fitting happens in [`crate::training`]; this module holds the fitted
//! pieces and the batch scorer that applies them.

pub mod artifact;
pub mod forest;
pub mod scaler;
pub mod scorer;
pub mod threshold;

// Re-export common types
pub use artifact::{ModelArtifact, TrainingSummary, ARTIFACT_FORMAT_VERSION, DEFAULT_MODEL_VERSION};
pub use forest::{ForestParams, IsolationForest, IsolationTree};
pub use scaler::StandardScaler;
pub use scorer::{ScoredResult, Scorer};
pub use threshold::{classify, percentile};
