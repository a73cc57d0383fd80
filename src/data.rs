//! Monthly time series loading and cleaning.
//!
//! The loader reads a CSV with a `Month` label column ("Mon-YY", e.g. "Jan-20")
//! and a numeric-or-numeric-like target column (CMR by default). Rows are
//! sorted chronologically after parsing; duplicate months pass through
//! unchecked, which is a documented limitation of the source data contract.
//!
//! Cleaning replaces every missing or uncoercible target value with the median
//! of the valid values. The median is computed once over the whole column, so
//! late observations influence the fill of early ones. That leakage is a known
//! property of the data contract, kept deliberately; see DESIGN.md.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use statrs::statistics::{Data, OrderStatistics};
use std::fs::File;
use std::path::Path;

/// Column names the loader looks for.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Name of the month label column
    pub month_column: String,
    /// Name of the target column
    pub target_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            month_column: "Month".to_string(),
            target_column: "CMR".to_string(),
        }
    }
}

/// Raw monthly series straight from the loader: sorted months plus the target
/// column with missing/uncoercible entries preserved as `None`.
#[derive(Debug, Clone)]
pub struct MonthlySeries {
    months: Vec<NaiveDate>,
    raw: Vec<Option<f64>>,
}

/// Fully imputed monthly series, immutable input to the feature builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSeries {
    months: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Parse a "Mon-YY" month label into the first day of that month.
///
/// The two-digit year always maps into the 2000s. Anything that does not match
/// the `Mon-YY` pattern is a `ParseError`.
pub fn parse_month_label(label: &str) -> Result<NaiveDate> {
    let trimmed = label.trim();
    let (mon, yy) = trimmed
        .split_once('-')
        .ok_or_else(|| ForecastError::ParseError(format!("invalid month label '{trimmed}'")))?;

    let month = match mon {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        other => {
            return Err(ForecastError::ParseError(format!(
                "unrecognized month abbreviation '{other}' in label '{trimmed}'"
            )))
        }
    };

    if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ForecastError::ParseError(format!(
            "invalid two-digit year in label '{trimmed}'"
        )));
    }
    let year = 2000
        + yy.parse::<i32>()
            .map_err(|e| ForecastError::ParseError(format!("year in '{trimmed}': {e}")))?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ForecastError::ParseError(format!("invalid calendar month '{trimmed}'")))
}

/// Load a monthly target series from a CSV file.
///
/// Other columns in the file are ignored. Rows come back sorted ascending by
/// parsed month; no deduplication is performed.
pub fn load_monthly_csv<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<MonthlySeries> {
    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;

    let months = parse_month_column(&df, &config.month_column)?;
    let raw = coerce_target_column(&df, &config.target_column)?;

    MonthlySeries::from_records(months, raw)
}

/// Extract and parse the month label column.
fn parse_month_column(df: &DataFrame, column: &str) -> Result<Vec<NaiveDate>> {
    let col = df
        .column(column)
        .map_err(|e| ForecastError::DataError(format!("column '{column}' not found: {e}")))?;

    match col.dtype() {
        DataType::Utf8 => col
            .utf8()
            .map_err(ForecastError::from)?
            .into_iter()
            .map(|opt| {
                let label = opt.ok_or_else(|| {
                    ForecastError::ParseError(format!("empty value in month column '{column}'"))
                })?;
                parse_month_label(label)
            })
            .collect(),
        other => Err(ForecastError::DataError(format!(
            "month column '{column}' must be a string column, got {other}"
        ))),
    }
}

/// Coerce the target column to `Option<f64>`, keeping coercion failures and
/// nulls as `None` for the cleaner to impute.
fn coerce_target_column(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(column)
        .map_err(|e| ForecastError::DataError(format!("column '{column}' not found: {e}")))?;

    let values = match col.dtype() {
        DataType::Utf8 => col
            .utf8()
            .map_err(ForecastError::from)?
            .into_iter()
            .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect(),
        DataType::Float64 => col.f64().map_err(ForecastError::from)?.into_iter().collect(),
        DataType::Float32 => col
            .f32()
            .map_err(ForecastError::from)?
            .into_iter()
            .map(|opt| opt.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .i64()
            .map_err(ForecastError::from)?
            .into_iter()
            .map(|opt| opt.map(|v| v as f64))
            .collect(),
        DataType::Int32 => col
            .i32()
            .map_err(ForecastError::from)?
            .into_iter()
            .map(|opt| opt.map(f64::from))
            .collect(),
        other => {
            return Err(ForecastError::DataError(format!(
                "target column '{column}' cannot be coerced to f64 from {other}"
            )))
        }
    };

    Ok(values)
}

/// Median of a non-empty slice.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut data = Data::new(values.to_vec());
    let m = data.median();
    m.is_finite().then_some(m)
}

impl MonthlySeries {
    /// Build a series from parallel month/value records, sorting by month.
    pub fn from_records(months: Vec<NaiveDate>, raw: Vec<Option<f64>>) -> Result<Self> {
        if months.len() != raw.len() {
            return Err(ForecastError::DataError(format!(
                "months ({}) and values ({}) have different lengths",
                months.len(),
                raw.len()
            )));
        }
        if months.is_empty() {
            return Err(ForecastError::DataError("empty input dataset".to_string()));
        }

        let mut order: Vec<usize> = (0..months.len()).collect();
        order.sort_by_key(|&i| months[i]);

        let sorted_months = order.iter().map(|&i| months[i]).collect();
        let sorted_raw = order.iter().map(|&i| raw[i]).collect();

        Ok(Self {
            months: sorted_months,
            raw: sorted_raw,
        })
    }

    /// Get the sorted months
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Get the raw target values, `None` where missing or uncoercible
    pub fn raw_values(&self) -> &[Option<f64>] {
        &self.raw
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Replace every missing target value with the global median of the valid
    /// ones. Fails with `DataError` when the column has no valid value at all.
    pub fn impute_median(&self) -> Result<CleanSeries> {
        let valid: Vec<f64> = self.raw.iter().flatten().copied().collect();
        let fill = median(&valid).ok_or_else(|| {
            ForecastError::DataError("target column has no valid numeric values".to_string())
        })?;

        let values = self.raw.iter().map(|v| v.unwrap_or(fill)).collect();

        Ok(CleanSeries {
            months: self.months.clone(),
            values,
        })
    }
}

impl CleanSeries {
    /// Build a clean series directly from sorted months and values (for tests
    /// and synthetic data).
    pub fn new(months: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if months.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "months ({}) and values ({}) have different lengths",
                months.len(),
                values.len()
            )));
        }
        if months.is_empty() {
            return Err(ForecastError::DataError("empty input dataset".to_string()));
        }
        Ok(Self { months, values })
    }

    /// Get the months
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Get the imputed target values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Years covered by the series, in order
    pub fn years(&self) -> Vec<i32> {
        self.months.iter().map(NaiveDate::year).collect()
    }
}
