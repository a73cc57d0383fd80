//! RBF kernel regression with a ridge penalty.
//!
//! The kernel bandwidth follows the "scale" convention: gamma is
//! 1 / (n_features * variance of the whole training matrix). The ridge term is
//! the reciprocal of the regularization constant C, so a large C means a
//! nearly interpolating fit. Fitting solves (K + I/C) alpha = y directly.

use crate::error::{ForecastError, Result};
use crate::models::{check_prediction_input, check_training_input, FittedRegressor, Regressor};

const DEFAULT_C: f64 = 10_000.0;

/// RBF kernel ridge regression
#[derive(Debug, Clone)]
pub struct KernelRidge {
    name: String,
    /// Fixed bandwidth; `None` selects the "scale" heuristic at fit time
    gamma: Option<f64>,
    /// Regularization constant; the ridge term is 1/C
    c: f64,
}

/// Fitted kernel ridge model: training rows plus dual coefficients
#[derive(Debug)]
pub struct FittedKernelRidge {
    name: String,
    gamma: f64,
    support: Vec<Vec<f64>>,
    alpha: Vec<f64>,
    width: usize,
}

impl KernelRidge {
    /// Create a kernel ridge model with explicit parameters.
    pub fn new(gamma: Option<f64>, c: f64) -> Result<Self> {
        if let Some(g) = gamma {
            if g <= 0.0 || !g.is_finite() {
                return Err(ForecastError::InvalidParameter(
                    "gamma must be positive and finite".to_string(),
                ));
            }
        }
        if c <= 0.0 || !c.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "C must be positive and finite".to_string(),
            ));
        }

        Ok(Self {
            name: format!("KernelRidge(rbf, C={c})"),
            gamma,
            c,
        })
    }
}

impl Default for KernelRidge {
    fn default() -> Self {
        Self::new(None, DEFAULT_C).expect("default hyperparameters are valid")
    }
}

impl Regressor for KernelRidge {
    type Fitted = FittedKernelRidge;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted> {
        check_training_input(features, target)?;

        let n = features.len();
        let width = features[0].len();
        let gamma = match self.gamma {
            Some(g) => g,
            None => scale_gamma(features, width),
        };

        // (K + I/C) alpha = y
        let ridge = 1.0 / self.c;
        let mut system = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let k = rbf(&features[i], &features[j], gamma);
                system[i][j] = k;
                system[j][i] = k;
            }
            system[i][i] += ridge;
        }

        let alpha = solve_symmetric(system, target.to_vec()).ok_or_else(|| {
            ForecastError::FitError("singular kernel system; cannot solve for alpha".to_string())
        })?;

        Ok(FittedKernelRidge {
            name: self.name.clone(),
            gamma,
            support: features.to_vec(),
            alpha,
            width,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedKernelRidge {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_prediction_input(features, self.width)?;

        Ok(features
            .iter()
            .map(|row| {
                self.support
                    .iter()
                    .zip(self.alpha.iter())
                    .map(|(sv, &a)| a * rbf(row, sv, self.gamma))
                    .sum()
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn rbf(a: &[f64], b: &[f64], gamma: f64) -> f64 {
    let sq_dist: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (-gamma * sq_dist).exp()
}

/// 1 / (n_features * variance of all matrix entries), with a fallback when the
/// matrix is constant.
fn scale_gamma(features: &[Vec<f64>], width: usize) -> f64 {
    let count = (features.len() * width) as f64;
    let mean = features.iter().flatten().sum::<f64>() / count;
    let var = features
        .iter()
        .flatten()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / count;

    if var > 0.0 {
        1.0 / (width as f64 * var)
    } else {
        1.0 / width as f64
    }
}

/// Gaussian elimination with partial pivoting. Returns `None` when the system
/// is numerically singular.
fn solve_symmetric(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for col in row + 1..n {
            acc -= a[row][col] * x[col];
        }
        x[row] = acc / a[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
