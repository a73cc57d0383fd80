use cmr_forecast::error::{ForecastError, Result};
use std::io;

#[test]
fn test_error_display_messages() {
    let cases = [
        (
            ForecastError::ParseError("bad label".to_string()),
            "Parse error: bad label",
        ),
        (
            ForecastError::DataError("empty column".to_string()),
            "Data error: empty column",
        ),
        (
            ForecastError::FitError("ragged rows".to_string()),
            "Fit error: ragged rows",
        ),
        (
            ForecastError::MetricError("length mismatch".to_string()),
            "Metric error: length mismatch",
        ),
        (
            ForecastError::InvalidParameter("C must be positive".to_string()),
            "Invalid parameter: C must be positive",
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_io_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "no such file");
    let error: ForecastError = io_error.into();

    assert!(matches!(error, ForecastError::IoError(_)));
    assert!(error.to_string().starts_with("IO error:"));
}

#[test]
fn test_result_alias_propagates() {
    fn fails() -> Result<f64> {
        Err(ForecastError::DataError("boom".to_string()))
    }

    fn caller() -> Result<f64> {
        let v = fails()?;
        Ok(v + 1.0)
    }

    assert!(matches!(caller(), Err(ForecastError::DataError(_))));
}

#[test]
fn test_errors_implement_std_error() {
    let error = ForecastError::ParseError("x".to_string());
    let as_std: &dyn std::error::Error = &error;
    assert!(!as_std.to_string().is_empty());
}
