//! Lag and calendar feature construction.
//!
//! For k in 1..=12 the builder derives `lag_k[i] = target[i-k]` over the
//! chronologically sorted series; entries before the dataset start are
//! undefined. Each lag column is then median-imputed over its own defined
//! values (computed over the whole column, the same leakage caveat as the
//! target cleaner), and only rows that are still incomplete after the fill are
//! dropped. With imputation running before the drop, rows only disappear when
//! a lag column has no defined value at all.

use crate::data::{median, CleanSeries};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Number of lag months used by the default pipeline.
pub const DEFAULT_LAGS: usize = 12;

/// Feature matrix with aligned months and target.
///
/// Feature columns are the `lags` lag values followed by month-of-year (1-12),
/// quarter (1-4), and year. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    months: Vec<NaiveDate>,
    target: Vec<f64>,
    rows: Vec<Vec<f64>>,
    lags: usize,
}

/// Build the lag/calendar feature table from a clean series.
pub fn build_lag_features(series: &CleanSeries, lags: usize) -> Result<FeatureTable> {
    if lags == 0 {
        return Err(ForecastError::InvalidParameter(
            "lag count must be positive".to_string(),
        ));
    }

    let target = series.values();
    let n = target.len();

    // Shift, then impute each lag column with its own median.
    let mut lag_columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(lags);
    for k in 1..=lags {
        let mut column: Vec<Option<f64>> = (0..n)
            .map(|i| (i >= k).then(|| target[i - k]))
            .collect();

        let defined: Vec<f64> = column.iter().flatten().copied().collect();
        if let Some(fill) = median(&defined) {
            for slot in column.iter_mut() {
                slot.get_or_insert(fill);
            }
        }
        lag_columns.push(column);
    }

    // Impute-then-drop: only rows with a residual hole survive removal here,
    // which can only happen when an entire lag column was undefined.
    let mut months = Vec::with_capacity(n);
    let mut kept_target = Vec::with_capacity(n);
    let mut rows = Vec::with_capacity(n);

    for i in 0..n {
        let lag_values: Option<Vec<f64>> = lag_columns.iter().map(|col| col[i]).collect();
        let Some(lag_values) = lag_values else {
            continue;
        };

        let month = series.months()[i];
        let mut row = lag_values;
        row.extend(calendar_features(month));

        months.push(month);
        kept_target.push(target[i]);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ForecastError::DataError(
            "no rows left after lag feature construction".to_string(),
        ));
    }

    Ok(FeatureTable {
        months,
        target: kept_target,
        rows,
        lags,
    })
}

/// Month-of-year, quarter, year for a calendar month.
pub fn calendar_features(month: NaiveDate) -> [f64; 3] {
    let m = month.month();
    [m as f64, ((m - 1) / 3 + 1) as f64, month.year() as f64]
}

impl FeatureTable {
    /// Assemble a table from pre-built parts. Used by the splitter; rows must
    /// already be aligned with months and target.
    pub(crate) fn from_parts(
        months: Vec<NaiveDate>,
        target: Vec<f64>,
        rows: Vec<Vec<f64>>,
        lags: usize,
    ) -> Self {
        Self {
            months,
            target,
            rows,
            lags,
        }
    }

    /// Get the months, aligned 1:1 with feature rows
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Get the target vector
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Get the feature rows (lags, then month, quarter, year)
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of lag columns
    pub fn lag_count(&self) -> usize {
        self.lags
    }

    /// Feature column names, in row order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = (1..=self.lags).map(|k| format!("last_{k}_month")).collect();
        names.push("month".to_string());
        names.push("quarter".to_string());
        names.push("year".to_string());
        names
    }

    /// Calendar year of a row
    pub fn year(&self, row: usize) -> i32 {
        self.months[row].year()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Table restricted to the given row indices, preserving order.
    pub(crate) fn subset(&self, indices: &[usize]) -> Self {
        Self {
            months: indices.iter().map(|&i| self.months[i]).collect(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            lags: self.lags,
        }
    }

    /// Concatenate two tables row-wise (train-then-test ordering).
    pub fn concat(&self, other: &Self) -> Self {
        let mut months = self.months.clone();
        months.extend_from_slice(&other.months);
        let mut target = self.target.clone();
        target.extend_from_slice(&other.target);
        let mut rows = self.rows.clone();
        rows.extend_from_slice(&other.rows);

        Self {
            months,
            target,
            rows,
            lags: self.lags,
        }
    }
}
