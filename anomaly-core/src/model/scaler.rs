//! Standard Scaler - per-column zero mean, unit variance

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Fitted standardization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on a non-empty matrix.
    ///
    /// Uses the population standard deviation. Constant columns get a scale
    /// of 1.0 so they transform to zero instead of NaN.
    pub fn fit(x: &Array2<f64>) -> ModelResult<Self> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyTrainingSet)?
            .to_vec();

        let scale = x
            .std_axis(Axis(0), 0.0)
            .iter()
            .map(|&s| if s > f64::EPSILON { s } else { 1.0 })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply `(x - mean) / scale` column-wise
    pub fn transform(&self, x: &Array2<f64>) -> ModelResult<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let mut out = x.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (m, s) = (self.mean[j], self.scale[j]);
            column.mapv_inplace(|v| (v - m) / s);
        }
        Ok(out)
    }
}
