use chrono::{Datelike, NaiveDate};
use cmr_forecast::data::CleanSeries;
use cmr_forecast::error::ForecastError;
use cmr_forecast::features::{build_lag_features, DEFAULT_LAGS};
use cmr_forecast::split::split_by_year;
use pretty_assertions::assert_eq;

fn ymd(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn monthly_table(start_year: i32, years: usize) -> cmr_forecast::FeatureTable {
    let n = years * 12;
    let months: Vec<NaiveDate> = (0..n)
        .map(|i| ymd(start_year + i as i32 / 12, (i % 12) as u32 + 1))
        .collect();
    let values: Vec<f64> = (0..n).map(|i| 3000.0 + i as f64).collect();
    let series = CleanSeries::new(months, values).unwrap();
    build_lag_features(&series, DEFAULT_LAGS).unwrap()
}

#[test]
fn test_split_partitions_by_year() {
    let table = monthly_table(2020, 4); // 2020..=2023
    let split = split_by_year(&table, 2022).unwrap();

    assert_eq!(split.train.len(), 36);
    assert_eq!(split.test.len(), 12);
    assert_eq!(split.len(), 48);
    assert_eq!(split.boundary_year, 2022);

    assert!(split.train.months().iter().all(|m| m.year() <= 2022));
    assert!(split.test.months().iter().all(|m| m.year() == 2023));
}

#[test]
fn test_rows_past_test_year_are_excluded() {
    let table = monthly_table(2020, 5); // includes 2024
    let split = split_by_year(&table, 2022).unwrap();

    // The 12 rows of 2024 belong to neither partition.
    assert_eq!(split.len(), 48);
    assert!(split
        .combined()
        .months()
        .iter()
        .all(|m| m.year() <= 2023));
}

#[test]
fn test_combined_is_train_then_test() {
    let table = monthly_table(2020, 4);
    let split = split_by_year(&table, 2022).unwrap();
    let combined = split.combined();

    assert_eq!(combined.len(), split.len());
    assert_eq!(&combined.months()[..36], split.train.months());
    assert_eq!(&combined.months()[36..], split.test.months());
    assert_eq!(&combined.target()[..36], split.train.target());
}

#[test]
fn test_split_fails_without_training_rows() {
    let table = monthly_table(2022, 2); // 2022..=2023
    assert!(matches!(
        split_by_year(&table, 2019),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_split_fails_without_test_rows() {
    let table = monthly_table(2020, 3); // 2020..=2022
    assert!(matches!(
        split_by_year(&table, 2022),
        Err(ForecastError::DataError(_))
    ));
}
