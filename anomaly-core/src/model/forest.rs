//! Isolation Forest - unsupervised outlier scoring
//!
//! Each tree recursively cuts a random subsample on a random feature at a
//! random value until points are isolated or the height limit is reached.
//! Outliers isolate in few cuts, so a short average path means anomalous.
//!
//! Score conventions:
//! - [`IsolationForest::score_samples`] is the native score, in `[-1, 0)`,
//!   lower is more abnormal.
//! - [`IsolationForest::anomaly_scores`] is its negation, higher is more
//!   anomalous. This is what thresholds and API responses use.

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::threshold::percentile;
use crate::error::{ModelError, ModelResult};

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,

    /// Subsample size per tree (capped at the number of rows)
    pub max_samples: usize,

    /// Expected outlier share, used for the native decision offset
    pub contamination: f64,

    /// Seed for the single RNG driving subsampling and splits
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_samples: 256,
            contamination: 0.03,
            seed: 42,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

/// One isolation tree, stored as a flat node list with the root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    pub nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(x: &Array2<f64>, indices: Vec<usize>, height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(x, indices, 0, height_limit, rng);
        tree
    }

    fn build(
        &mut self,
        x: &Array2<f64>,
        indices: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: indices.len() });

        if depth >= height_limit || indices.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|j| {
                let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    let v = x[[i, j]];
                    (lo.min(v), hi.max(v))
                });
                (max > min).then_some((j, min, max))
            })
            .collect();

        if candidates.is_empty() {
            return id;
        }

        let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(min..max);

        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| x[[i, feature]] <= threshold);

        let left = self.build(x, left, depth + 1, height_limit, rng);
        let right = self.build(x, right, depth + 1, height_limit, rng);
        self.nodes[id] = Node::Split { feature, threshold, left, right };

        id
    }

    /// Depth of the sample's leaf plus the expected remaining depth there
    pub fn path_length(&self, sample: ArrayView1<f64>) -> f64 {
        let mut id = 0;
        let mut depth = 0.0;

        loop {
            match self.nodes[id] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split { feature, threshold, left, right } => {
                    id = if sample[feature] <= threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }

    /// Structural check for trees read back from disk.
    ///
    /// Children must point forward, so traversal always terminates.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split { feature, threshold, left, right } = *node {
                if feature >= n_features {
                    return Err(format!("node {} splits on unknown feature {}", id, feature));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite split value", id));
                }
                if left <= id || right <= id || left >= self.nodes.len() || right >= self.nodes.len() {
                    return Err(format!("node {} has invalid children", id));
                }
            }
        }

        Ok(())
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    pub params: ForestParams,

    /// Subsample size actually used per tree
    pub sample_size: usize,

    pub n_features: usize,

    /// `contamination` percentile of native training scores
    pub offset: f64,

    pub trees: Vec<IsolationTree>,
}

impl IsolationForest {
    /// Fit on an already standardized matrix
    pub fn fit(x: &Array2<f64>, params: ForestParams) -> ModelResult<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let sample_size = params.max_samples.clamp(1, n);
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.n_estimators)
            .map(|_| {
                let indices = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::grow(x, indices, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            params,
            sample_size,
            n_features: x.ncols(),
            offset: 0.0,
            trees,
        };

        let native = forest.score_samples(x)?;
        forest.offset = percentile(&native.to_vec(), 100.0 * forest.params.contamination)?;

        tracing::debug!(
            trees = forest.trees.len(),
            sample_size,
            height_limit,
            offset = forest.offset,
            "Isolation forest fitted"
        );

        Ok(forest)
    }

    /// Native score: `-2^(-E[path] / c(sample_size))`, lower is more abnormal
    pub fn score_samples(&self, x: &Array2<f64>) -> ModelResult<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("forest has no trees".to_string()));
        }

        let normalizer = average_path_length(self.sample_size).max(1.0);
        let n_trees = self.trees.len() as f64;

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let mean_path = self.trees.iter().map(|t| t.path_length(row)).sum::<f64>() / n_trees;
                -(2f64.powf(-mean_path / normalizer))
            })
            .collect())
    }

    /// Higher = more anomalous
    pub fn anomaly_scores(&self, x: &Array2<f64>) -> ModelResult<Array1<f64>> {
        Ok(-self.score_samples(x)?)
    }

    /// Negative values are outliers under the contamination assumption
    pub fn decision_function(&self, x: &Array2<f64>) -> ModelResult<Array1<f64>> {
        Ok(self.score_samples(x)? - self.offset)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.sample_size == 0 {
            return Err("forest sample size is zero".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 2), |(i, j)| ((i * (j + 3)) % 17) as f64 / 17.0)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) ≈ 10.24
        assert!((average_path_length(256) - 10.244).abs() < 0.01);
    }

    #[test]
    fn test_fit_is_reproducible_with_seed() {
        let x = grid(64);
        let a = IsolationForest::fit(&x, small_params()).unwrap();
        let b = IsolationForest::fit(&x, small_params()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_changes_trees() {
        let x = grid(64);
        let a = IsolationForest::fit(&x, small_params()).unwrap();
        let b = IsolationForest::fit(&x, ForestParams { seed: 7, ..small_params() }).unwrap();

        assert_ne!(a.trees, b.trees);
    }

    #[test]
    fn test_outlier_scores_higher() {
        let mut x = grid(64);
        x[[0, 0]] = 25.0;
        x[[0, 1]] = -25.0;

        let forest = IsolationForest::fit(&x, small_params()).unwrap();
        let scores = forest.anomaly_scores(&x).unwrap();
        let max_inlier = scores.iter().skip(1).cloned().fold(f64::MIN, f64::max);

        assert!(scores[0] > max_inlier);
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
    }

    #[test]
    fn test_tree_sample_size_capped_by_rows() {
        let forest = IsolationForest::fit(&grid(10), small_params()).unwrap();
        assert_eq!(forest.sample_size, 10);
        assert_eq!(forest.trees.len(), 50);
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_constant_data_yields_single_leaf_trees() {
        let x = Array2::from_elem((8, 3), 1.5);
        let forest = IsolationForest::fit(&x, small_params()).unwrap();

        assert!(forest.trees.iter().all(|t| t.nodes == vec![Node::Leaf { size: 8 }]));
        let scores = forest.anomaly_scores(&x).unwrap();
        assert!(scores.iter().all(|&s| s == scores[0]));
    }

    #[test]
    fn test_decision_function_flags_contamination_share() {
        let x = grid(100);
        let forest = IsolationForest::fit(&x, ForestParams { contamination: 0.1, ..small_params() }).unwrap();
        let decision = forest.decision_function(&x).unwrap();
        let flagged = decision.iter().filter(|&&d| d < 0.0).count();

        assert!(flagged <= 10);
    }

    #[test]
    fn test_score_rejects_wrong_width() {
        let forest = IsolationForest::fit(&grid(16), small_params()).unwrap();
        let err = forest.score_samples(&array![[1.0, 2.0, 3.0]]).unwrap_err();

        assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = IsolationTree {
            nodes: vec![
                Node::Split { feature: 0, threshold: 0.5, left: 0, right: 1 },
                Node::Leaf { size: 1 },
            ],
        };

        assert!(tree.validate(1).is_err());
    }
}
