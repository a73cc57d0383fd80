//! Regression models for the lag-feature matrix.
//!
//! Models come in the two-stage shape used across the crate: an unfitted
//! configuration implementing [`Regressor`] and a fitted counterpart
//! implementing the object-safe [`FittedRegressor`]. The pipeline treats the
//! four concrete models uniformly through [`ModelSpec`].

use crate::error::{ForecastError, Result};
use std::fmt::Debug;

pub mod gradient_boosting;
pub mod kernel_ridge;
pub mod random_forest;
mod tree;

pub use gradient_boosting::{GradientBoosting, ObliviousBoosting};
pub use kernel_ridge::KernelRidge;
pub use random_forest::RandomForest;

/// Regression model that can be fitted on a feature matrix and target vector.
pub trait Regressor: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedRegressor;

    /// Fit the model on training features and target
    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Fitted regression model
pub trait FittedRegressor: Debug {
    /// Predict one value per input row
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A fitted model boxed behind the uniform prediction seam.
#[derive(Debug)]
pub struct FittedModel {
    inner: Box<dyn FittedRegressor>,
}

impl FittedModel {
    /// Name of the underlying model
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Predict one value per input row
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.inner.predict(features)
    }
}

/// Configured model variant; lets the pipeline fit and evaluate all four
/// regressors through one code path.
#[derive(Debug, Clone)]
pub enum ModelSpec {
    /// Depth-wise gradient-boosted trees
    GradientBoosting(GradientBoosting),
    /// Boosted oblivious (symmetric) trees
    ObliviousBoosting(ObliviousBoosting),
    /// RBF kernel ridge regression
    KernelRidge(KernelRidge),
    /// Bagged regression trees
    RandomForest(RandomForest),
}

impl ModelSpec {
    /// Get the name of the configured model
    pub fn name(&self) -> &str {
        match self {
            Self::GradientBoosting(m) => m.name(),
            Self::ObliviousBoosting(m) => m.name(),
            Self::KernelRidge(m) => m.name(),
            Self::RandomForest(m) => m.name(),
        }
    }

    /// Fit the configured model, erasing the concrete fitted type
    pub fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<FittedModel> {
        let inner: Box<dyn FittedRegressor> = match self {
            Self::GradientBoosting(m) => Box::new(m.fit(features, target)?),
            Self::ObliviousBoosting(m) => Box::new(m.fit(features, target)?),
            Self::KernelRidge(m) => Box::new(m.fit(features, target)?),
            Self::RandomForest(m) => Box::new(m.fit(features, target)?),
        };
        Ok(FittedModel { inner })
    }
}

/// The four models the comparison run fits, with their fixed hyperparameters.
pub fn default_suite() -> Vec<ModelSpec> {
    vec![
        ModelSpec::GradientBoosting(GradientBoosting::default()),
        ModelSpec::ObliviousBoosting(ObliviousBoosting::default()),
        ModelSpec::KernelRidge(KernelRidge::default()),
        ModelSpec::RandomForest(RandomForest::default()),
    ]
}

/// Validate a training matrix/target pair before fitting.
///
/// Rejects empty input, ragged rows, length mismatches, and non-finite values
/// with a `FitError`.
pub(crate) fn check_training_input(features: &[Vec<f64>], target: &[f64]) -> Result<()> {
    if features.is_empty() || target.is_empty() {
        return Err(ForecastError::FitError(
            "empty training features or target".to_string(),
        ));
    }
    if features.len() != target.len() {
        return Err(ForecastError::FitError(format!(
            "feature rows ({}) and target length ({}) differ",
            features.len(),
            target.len()
        )));
    }

    let width = features[0].len();
    if width == 0 {
        return Err(ForecastError::FitError(
            "feature rows have no columns".to_string(),
        ));
    }
    for (i, row) in features.iter().enumerate() {
        if row.len() != width {
            return Err(ForecastError::FitError(format!(
                "feature row {i} has {} columns, expected {width}",
                row.len()
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitError(format!(
                "non-finite feature value in row {i}"
            )));
        }
    }
    if target.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::FitError(
            "non-finite target value".to_string(),
        ));
    }

    Ok(())
}

/// Validate a prediction matrix against the fitted feature width.
pub(crate) fn check_prediction_input(features: &[Vec<f64>], width: usize) -> Result<()> {
    for (i, row) in features.iter().enumerate() {
        if row.len() != width {
            return Err(ForecastError::FitError(format!(
                "prediction row {i} has {} columns, model was fitted on {width}",
                row.len()
            )));
        }
    }
    Ok(())
}
