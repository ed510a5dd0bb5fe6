//! Data models

pub mod login_feature;
pub mod predict;

pub use login_feature::*;
pub use predict::*;
