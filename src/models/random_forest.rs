//! Bagged regression trees with a fixed bootstrap seed.

use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeConfig};
use crate::models::{check_prediction_input, check_training_input, FittedRegressor, Regressor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RF_ESTIMATORS: usize = 100;
const RF_MAX_DEPTH: usize = 10;
const RF_SEED: u64 = 42;

/// Random forest regressor
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    n_estimators: usize,
    max_depth: usize,
    seed: u64,
}

/// Fitted random forest
#[derive(Debug)]
pub struct FittedRandomForest {
    name: String,
    trees: Vec<RegressionTree>,
    width: usize,
}

impl RandomForest {
    /// Create a random forest with explicit hyperparameters.
    pub fn new(n_estimators: usize, max_depth: usize, seed: u64) -> Result<Self> {
        if n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("RandomForest(n={n_estimators}, depth={max_depth}, seed={seed})"),
            n_estimators,
            max_depth,
            seed,
        })
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(RF_ESTIMATORS, RF_MAX_DEPTH, RF_SEED).expect("default hyperparameters are valid")
    }
}

impl Regressor for RandomForest {
    type Fitted = FittedRandomForest;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted> {
        check_training_input(features, target)?;

        let n = target.len();
        let config = TreeConfig {
            max_depth: self.max_depth,
            min_samples_leaf: 1,
        };
        let mut rng = StdRng::seed_from_u64(self.seed);

        let trees = (0..self.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(features, target, &sample, config)
            })
            .collect();

        Ok(FittedRandomForest {
            name: self.name.clone(),
            trees,
            width: features[0].len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedRandomForest {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_prediction_input(features, self.width)?;

        Ok(features
            .iter()
            .map(|row| {
                let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
                sum / self.trees.len() as f64
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
