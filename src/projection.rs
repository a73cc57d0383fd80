//! Forward extrapolation one calendar year past the test set.
//!
//! Builds 12 future rows whose lag features are seeded from the tail of the
//! historical target series, not from the models' own predictions. Early
//! future months therefore carry true historical lags while later ones reuse
//! increasingly stale values. A recursive forecast would avoid that but
//! compounds model error instead; the trade-off is recorded in DESIGN.md.

use crate::data::median;
use crate::error::{ForecastError, Result};
use crate::features::{calendar_features, FeatureTable};
use crate::models::FittedModel;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Number of projected months (one calendar year).
pub const PROJECTION_MONTHS: usize = 12;

/// Per-model predictions over the projected year
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionFrame {
    /// The twelve projected months
    pub months: Vec<NaiveDate>,
    /// Model name and its twelve predicted values, in suite order
    pub predictions: Vec<(String, Vec<f64>)>,
}

/// Project the given calendar year with every fitted model.
///
/// `history` is the train-then-test feature table the models were evaluated
/// on; its target series seeds the future lag features. Lag positions that
/// would reach before the history start fall back to the historical median.
pub fn project_year(
    models: &[FittedModel],
    history: &FeatureTable,
    year: i32,
) -> Result<ProjectionFrame> {
    if models.is_empty() {
        return Err(ForecastError::DataError(
            "no fitted models to project with".to_string(),
        ));
    }

    let target = history.target();
    let fallback = median(target).ok_or_else(|| {
        ForecastError::DataError("empty history; nothing to seed projections from".to_string())
    })?;

    let lags = history.lag_count();
    let len = target.len() as isize;

    let mut months = Vec::with_capacity(PROJECTION_MONTHS);
    let mut rows = Vec::with_capacity(PROJECTION_MONTHS);
    for j in 0..PROJECTION_MONTHS {
        let month = NaiveDate::from_ymd_opt(year, j as u32 + 1, 1).ok_or_else(|| {
            ForecastError::DataError(format!("invalid projection year {year}"))
        })?;

        // Seed lag_k for future row j from the historical tail: the value at
        // index len - 12 + j - k, median when that reaches before the start.
        let mut row = Vec::with_capacity(lags + 3);
        for k in 1..=lags as isize {
            let idx = len - PROJECTION_MONTHS as isize + j as isize - k;
            let value = if idx >= 0 {
                target[idx as usize]
            } else {
                fallback
            };
            row.push(value);
        }
        row.extend(calendar_features(month));

        months.push(month);
        rows.push(row);
    }

    let mut predictions = Vec::with_capacity(models.len());
    for model in models {
        let values = model.predict(&rows)?;
        info!(model = model.name(), year, "projected forward year");
        predictions.push((model.name().to_string(), values));
    }

    Ok(ProjectionFrame {
        months,
        predictions,
    })
}
