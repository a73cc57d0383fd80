//! Error types for the cmr_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the cmr_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed month label or unparseable field in the input
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Model training failure on malformed features or target
    #[error("Fit error: {0}")]
    FitError(String),

    /// Mismatched-length or undefined-metric inputs
    #[error("Metric error: {0}")]
    MetricError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
