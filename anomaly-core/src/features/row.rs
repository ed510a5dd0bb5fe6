//! Feature rows - the scoring-time and training-time shapes of one login event

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;

/// One login event as sent to the scorer.
///
/// Absent optional fields are scored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub event_id: i64,
    pub hour_of_day: i32,
    #[serde(default)]
    pub minutes_since_prev: Option<f64>,
    #[serde(default)]
    pub geo_km_from_prev: Option<f64>,
    #[serde(default)]
    pub failed_15m: Option<i32>,
    pub is_night: i32,
}

impl FeatureRow {
    /// Vector in layout order, zero-filling absent fields
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.hour_of_day),
            self.minutes_since_prev.unwrap_or(0.0),
            self.geo_km_from_prev.unwrap_or(0.0),
            f64::from(self.failed_15m.unwrap_or(0)),
            f64::from(self.is_night),
        ]
    }
}

/// One row of the historical feature table. Every feature may be NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingRow {
    pub event_id: i64,
    pub hour_of_day: Option<f64>,
    pub minutes_since_prev: Option<f64>,
    pub geo_km_from_prev: Option<f64>,
    pub failed_15m: Option<f64>,
    pub is_night: Option<f64>,
}

impl TrainingRow {
    /// Vector in layout order, or `None` if any feature is NULL, NaN or
    /// infinite (all legal `float8` values).
    ///
    /// Training drops incomplete rows where scoring zero-fills them.
    pub fn complete(&self) -> Option<[f64; FEATURE_COUNT]> {
        let vector = [
            self.hour_of_day?,
            self.minutes_since_prev?,
            self.geo_km_from_prev?,
            self.failed_15m?,
            self.is_night?,
        ];
        vector.iter().all(|v| v.is_finite()).then_some(vector)
    }
}

/// Stack vectors into an `n × FEATURE_COUNT` matrix
pub fn stack_rows(vectors: &[[f64; FEATURE_COUNT]]) -> Array2<f64> {
    let mut matrix = Array2::<f64>::zeros((vectors.len(), FEATURE_COUNT));
    for (mut row, vector) in matrix.rows_mut().into_iter().zip(vectors) {
        for (cell, value) in row.iter_mut().zip(vector) {
            *cell = *value;
        }
    }
    matrix
}
