//! Boosted tree ensembles: depth-wise trees and oblivious (symmetric) trees.
//!
//! Both fit squared-error gradient boosting from a mean base score. The
//! depth-wise variant grows ordinary greedy regression trees; the oblivious
//! variant picks one split condition per level shared across the whole level,
//! with L2 regularization on the leaf values.

use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeConfig};
use crate::models::{check_prediction_input, check_training_input, FittedRegressor, Regressor};

const GB_ESTIMATORS: usize = 100;
const GB_LEARNING_RATE: f64 = 0.1;
const GB_MAX_DEPTH: usize = 5;

const OB_ITERATIONS: usize = 100;
const OB_LEARNING_RATE: f64 = 0.2;
const OB_DEPTH: usize = 5;
const OB_L2_LEAF_REG: f64 = 1.0;

/// Gradient-boosted regression trees
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    name: String,
    n_estimators: usize,
    learning_rate: f64,
    max_depth: usize,
}

/// Fitted gradient-boosted ensemble
#[derive(Debug)]
pub struct FittedGradientBoosting {
    name: String,
    base: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    width: usize,
}

impl GradientBoosting {
    /// Create a gradient boosting model with explicit hyperparameters.
    pub fn new(n_estimators: usize, learning_rate: f64, max_depth: usize) -> Result<Self> {
        if n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if learning_rate <= 0.0 || learning_rate > 1.0 {
            return Err(ForecastError::InvalidParameter(
                "learning rate must be in (0, 1]".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("GradientBoosting(n={n_estimators}, lr={learning_rate}, depth={max_depth})"),
            n_estimators,
            learning_rate,
            max_depth,
        })
    }
}

impl Default for GradientBoosting {
    fn default() -> Self {
        Self::new(GB_ESTIMATORS, GB_LEARNING_RATE, GB_MAX_DEPTH)
            .expect("default hyperparameters are valid")
    }
}

impl Regressor for GradientBoosting {
    type Fitted = FittedGradientBoosting;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted> {
        check_training_input(features, target)?;

        let n = target.len();
        let base = target.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![base; n];
        let mut residuals = vec![0.0; n];
        let indices: Vec<usize> = (0..n).collect();
        let config = TreeConfig {
            max_depth: self.max_depth,
            min_samples_leaf: 1,
        };

        let mut trees = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            for i in 0..n {
                residuals[i] = target[i] - predictions[i];
            }
            let tree = RegressionTree::fit(features, &residuals, &indices, config);
            for (i, row) in features.iter().enumerate() {
                predictions[i] += self.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        Ok(FittedGradientBoosting {
            name: self.name.clone(),
            base,
            learning_rate: self.learning_rate,
            trees,
            width: features[0].len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedGradientBoosting {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_prediction_input(features, self.width)?;

        Ok(features
            .iter()
            .map(|row| {
                let boost: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
                self.base + self.learning_rate * boost
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One level of an oblivious tree: the same condition applied to every node.
#[derive(Debug, Clone, Copy)]
struct Level {
    feature: usize,
    threshold: f64,
}

/// A symmetric tree: `levels.len()` shared conditions, 2^depth leaf values.
#[derive(Debug, Clone)]
struct ObliviousTree {
    levels: Vec<Level>,
    leaves: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, row: &[f64]) -> usize {
        let mut idx = 0;
        for level in &self.levels {
            idx = (idx << 1) | usize::from(row[level.feature] > level.threshold);
        }
        idx
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.leaves[self.leaf_index(row)]
    }
}

/// Boosted oblivious trees with L2-regularized leaf values
#[derive(Debug, Clone)]
pub struct ObliviousBoosting {
    name: String,
    iterations: usize,
    learning_rate: f64,
    depth: usize,
    l2_leaf_reg: f64,
}

/// Fitted oblivious-tree ensemble
#[derive(Debug)]
pub struct FittedObliviousBoosting {
    name: String,
    base: f64,
    learning_rate: f64,
    trees: Vec<ObliviousTree>,
    width: usize,
}

impl ObliviousBoosting {
    /// Create an oblivious boosting model with explicit hyperparameters.
    pub fn new(iterations: usize, learning_rate: f64, depth: usize, l2_leaf_reg: f64) -> Result<Self> {
        if iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "iterations must be positive".to_string(),
            ));
        }
        if learning_rate <= 0.0 || learning_rate > 1.0 {
            return Err(ForecastError::InvalidParameter(
                "learning rate must be in (0, 1]".to_string(),
            ));
        }
        if depth == 0 || depth > 16 {
            return Err(ForecastError::InvalidParameter(
                "depth must be in 1..=16".to_string(),
            ));
        }
        if l2_leaf_reg < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "l2_leaf_reg must be non-negative".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "ObliviousBoosting(iters={iterations}, lr={learning_rate}, depth={depth}, l2={l2_leaf_reg})"
            ),
            iterations,
            learning_rate,
            depth,
            l2_leaf_reg,
        })
    }

    /// Build one oblivious tree on the residuals.
    fn build_tree(&self, features: &[Vec<f64>], residuals: &[f64]) -> ObliviousTree {
        let n = residuals.len();
        let width = features[0].len();
        let mut leaf_of: Vec<usize> = vec![0; n];
        let mut levels = Vec::with_capacity(self.depth);

        for level_no in 0..self.depth {
            let leaf_count = 1 << (level_no + 1);
            let mut best: Option<(Level, f64)> = None;

            for feature in 0..width {
                for threshold in candidate_thresholds(features, feature) {
                    // Score the shared condition: SSE over the would-be leaves,
                    // with the L2 term in the leaf value denominator.
                    let mut sums = vec![0.0; leaf_count];
                    let mut counts = vec![0usize; leaf_count];
                    for i in 0..n {
                        let leaf =
                            (leaf_of[i] << 1) | usize::from(features[i][feature] > threshold);
                        sums[leaf] += residuals[i];
                        counts[leaf] += 1;
                    }

                    let mut gain = 0.0;
                    for leaf in 0..leaf_count {
                        if counts[leaf] > 0 {
                            gain += sums[leaf] * sums[leaf]
                                / (counts[leaf] as f64 + self.l2_leaf_reg);
                        }
                    }

                    if best.as_ref().map_or(true, |(_, g)| gain > *g) {
                        best = Some((Level { feature, threshold }, gain));
                    }
                }
            }

            let Some((level, _)) = best else { break };
            for i in 0..n {
                leaf_of[i] =
                    (leaf_of[i] << 1) | usize::from(features[i][level.feature] > level.threshold);
            }
            levels.push(level);
        }

        let leaf_count = 1 << levels.len();
        let mut sums = vec![0.0; leaf_count];
        let mut counts = vec![0usize; leaf_count];
        for i in 0..n {
            sums[leaf_of[i]] += residuals[i];
            counts[leaf_of[i]] += 1;
        }
        let leaves = sums
            .iter()
            .zip(counts.iter())
            .map(|(&s, &c)| s / (c as f64 + self.l2_leaf_reg))
            .collect();

        ObliviousTree { levels, leaves }
    }
}

impl Default for ObliviousBoosting {
    fn default() -> Self {
        Self::new(OB_ITERATIONS, OB_LEARNING_RATE, OB_DEPTH, OB_L2_LEAF_REG)
            .expect("default hyperparameters are valid")
    }
}

impl Regressor for ObliviousBoosting {
    type Fitted = FittedObliviousBoosting;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted> {
        check_training_input(features, target)?;

        let n = target.len();
        let base = target.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![base; n];
        let mut residuals = vec![0.0; n];

        let mut trees = Vec::with_capacity(self.iterations);
        for _ in 0..self.iterations {
            for i in 0..n {
                residuals[i] = target[i] - predictions[i];
            }
            let tree = self.build_tree(features, &residuals);
            for (i, row) in features.iter().enumerate() {
                predictions[i] += self.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        Ok(FittedObliviousBoosting {
            name: self.name.clone(),
            base,
            learning_rate: self.learning_rate,
            trees,
            width: features[0].len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedObliviousBoosting {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_prediction_input(features, self.width)?;

        Ok(features
            .iter()
            .map(|row| {
                let boost: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
                self.base + self.learning_rate * boost
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Midpoints between adjacent distinct values of one feature column.
fn candidate_thresholds(features: &[Vec<f64>], feature: usize) -> Vec<f64> {
    let mut values: Vec<f64> = features.iter().map(|row| row[feature]).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();

    values
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}
