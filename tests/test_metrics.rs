use assert_approx_eq::assert_approx_eq;
use cmr_forecast::error::ForecastError;
use cmr_forecast::metrics::{
    evaluate_forecast, mean_absolute_error, mean_absolute_percentage_error,
    r2_score, root_mean_squared_error,
};

const ACTUAL: [f64; 3] = [100.0, 200.0, 300.0];
const PREDICTED: [f64; 3] = [110.0, 190.0, 300.0];

#[test]
fn test_mape_in_percent() {
    let mape = mean_absolute_percentage_error(&ACTUAL, &PREDICTED).unwrap();
    // (0.10 + 0.05 + 0.00) / 3 * 100
    assert_approx_eq!(mape, 5.0, 1e-10);
}

#[test]
fn test_rmse() {
    let rmse = root_mean_squared_error(&ACTUAL, &PREDICTED).unwrap();
    assert_approx_eq!(rmse, (200.0f64 / 3.0).sqrt(), 1e-10);
}

#[test]
fn test_r2() {
    let r2 = r2_score(&ACTUAL, &PREDICTED).unwrap();
    // ss_res = 200, ss_tot = 20000
    assert_approx_eq!(r2, 0.99, 1e-10);
}

#[test]
fn test_mae() {
    let mae = mean_absolute_error(&ACTUAL, &PREDICTED).unwrap();
    assert_approx_eq!(mae, 20.0 / 3.0, 1e-10);
}

#[test]
fn test_perfect_prediction() {
    let metrics = evaluate_forecast(&ACTUAL, &ACTUAL).unwrap();
    assert_approx_eq!(metrics.mape, 0.0, 1e-12);
    assert_approx_eq!(metrics.rmse, 0.0, 1e-12);
    assert_approx_eq!(metrics.r2, 1.0, 1e-12);
    assert_approx_eq!(metrics.mae, 0.0, 1e-12);
}

#[test]
fn test_evaluate_forecast_bundles_all_four() {
    let metrics = evaluate_forecast(&ACTUAL, &PREDICTED).unwrap();
    assert_approx_eq!(metrics.mape, 5.0, 1e-10);
    assert_approx_eq!(metrics.mae, 20.0 / 3.0, 1e-10);
}

#[test]
fn test_mape_rejects_zero_actual() {
    let result = mean_absolute_percentage_error(&[100.0, 0.0], &[90.0, 10.0]);
    assert!(matches!(result, Err(ForecastError::MetricError(_))));
}

#[test]
fn test_metrics_reject_mismatched_lengths() {
    assert!(matches!(
        mean_absolute_error(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::MetricError(_))
    ));
    assert!(matches!(
        root_mean_squared_error(&[1.0], &[1.0, 2.0]),
        Err(ForecastError::MetricError(_))
    ));
}

#[test]
fn test_metrics_reject_empty_input() {
    assert!(matches!(
        evaluate_forecast(&[], &[]),
        Err(ForecastError::MetricError(_))
    ));
}

#[test]
fn test_r2_undefined_for_constant_actual() {
    let result = r2_score(&[5.0, 5.0, 5.0], &[4.0, 5.0, 6.0]);
    assert!(matches!(result, Err(ForecastError::MetricError(_))));
}

#[test]
fn test_metrics_display_format() {
    let metrics = evaluate_forecast(&ACTUAL, &PREDICTED).unwrap();
    let printed = format!("{metrics}");

    assert!(printed.contains("Mean Absolute Percentage Error (MAPE): 5.000%"));
    assert!(printed.contains("Mean Absolute Error (MAE): 6.67"));
    assert!(printed.contains("R² Score: 0.99"));
}
