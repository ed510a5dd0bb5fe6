//! Features Module - login event feature rows and their fixed layout
//!
//! Both the trainer and the scorer build vectors through this module.
//! Never assemble a feature vector by hand elsewhere.

pub mod layout;
pub mod row;


pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo};
pub use row::{stack_rows, FeatureRow, TrainingRow};
