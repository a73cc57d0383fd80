//! Metrics for evaluating forecast accuracy.
//!
//! All metrics are pure functions of two equal-length sequences and fail with
//! `MetricError` on mismatched or empty input. The percentage error is
//! undefined when an actual value is exactly zero and returns the typed error
//! rather than letting a division artifact propagate.

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// The four comparison metrics computed per model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Percentage Error, in percent
    pub mape: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean Absolute Error
    pub mae: f64,
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::MetricError(format!(
            "actual ({}) and predicted ({}) must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Mean absolute percentage error, in percent.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    if actual.iter().any(|&a| a == 0.0) {
        return Err(ForecastError::MetricError(
            "percentage error undefined for zero actual value".to_string(),
        ));
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| ((a - p) / a).abs())
        .sum();

    Ok(sum / actual.len() as f64 * 100.0)
}

/// Root mean squared error.
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(mse.sqrt())
}

/// Coefficient of determination.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|&a| (a - mean) * (a - mean)).sum();
    if ss_tot == 0.0 {
        return Err(ForecastError::MetricError(
            "R² undefined for a constant actual series".to_string(),
        ));
    }

    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| (a - p) * (a - p))
        .sum();

    Ok(1.0 - ss_res / ss_tot)
}

/// Mean absolute error.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Compute all four comparison metrics for one prediction series.
pub fn evaluate_forecast(actual: &[f64], predicted: &[f64]) -> Result<ForecastMetrics> {
    Ok(ForecastMetrics {
        mape: mean_absolute_percentage_error(actual, predicted)?,
        rmse: root_mean_squared_error(actual, predicted)?,
        r2: r2_score(actual, predicted)?,
        mae: mean_absolute_error(actual, predicted)?,
    })
}

impl std::fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mean Absolute Percentage Error (MAPE): {:.3}%", self.mape)?;
        writeln!(f, "Root Mean Squared Error (RMSE): {:.2}", self.rmse)?;
        writeln!(f, "R² Score: {:.2}", self.r2)?;
        writeln!(f, "Mean Absolute Error (MAE): {:.2}", self.mae)?;
        Ok(())
    }
}
