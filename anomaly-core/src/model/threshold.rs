//! Decision threshold
//!
//! The threshold is fixed once at fit time from the training score
//! distribution and never adjusted afterwards.

use crate::error::{ModelError, ModelResult};

/// Default cutoff percentile over training anomaly scores
pub const DEFAULT_PERCENTILE: f64 = 97.0;

/// Percentile with linear interpolation between closest ranks
pub fn percentile(values: &[f64], p: f64) -> ModelResult<f64> {
    if values.is_empty() {
        return Err(ModelError::EmptyScores);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// 1 when the score reaches the threshold, 0 otherwise
pub fn classify(score: f64, threshold: f64) -> u8 {
    u8::from(score >= threshold)
}
