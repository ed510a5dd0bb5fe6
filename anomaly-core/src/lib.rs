//! Login Anomaly Scoring - Core Library
//!
//! Shared between the offline trainer and the scoring server:
//!
//! ```text
//! ┌──────────────┐   model.json   ┌──────────────┐
//! │   Trainer    │ ─────────────▶ │    Scorer    │
//! │ fit scaler + │                │ load once,   │
//! │ forest, p97  │                │ score batch  │
//! └──────────────┘                └──────────────┘
//! ```
//!
//! The trainer and the scorer never talk to each other. The artifact file
//! is the only handoff, so both sides go through [`features::layout`] to
//! agree on the feature order.

pub mod error;
pub mod features;
pub mod model;
pub mod training;

pub use error::{ModelError, ModelResult};
pub use features::{FeatureRow, TrainingRow, FEATURE_COUNT};
pub use model::{ModelArtifact, ScoredResult, Scorer, DEFAULT_MODEL_VERSION};
pub use training::{train, TrainingParams};
