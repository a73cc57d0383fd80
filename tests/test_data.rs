use chrono::NaiveDate;
use cmr_forecast::data::{load_monthly_csv, parse_month_label, LoaderConfig, MonthlySeries};
use cmr_forecast::error::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn ymd(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

#[rstest]
#[case("Jan-20", 2020, 1)]
#[case("Feb-20", 2020, 2)]
#[case("Jun-21", 2021, 6)]
#[case("Sep-22", 2022, 9)]
#[case("Dec-23", 2023, 12)]
fn test_parse_month_label(#[case] label: &str, #[case] year: i32, #[case] month: u32) {
    assert_eq!(parse_month_label(label).unwrap(), ymd(year, month));
}

#[test]
fn test_parse_month_label_trims_whitespace() {
    assert_eq!(parse_month_label(" Mar-21 ").unwrap(), ymd(2021, 3));
}

#[test]
fn test_two_digit_year_maps_into_2000s() {
    assert_eq!(parse_month_label("Jan-99").unwrap(), ymd(2099, 1));
    assert_eq!(parse_month_label("Jan-00").unwrap(), ymd(2000, 1));
}

#[rstest]
#[case("January-20")]
#[case("Jan-2020")]
#[case("Jan20")]
#[case("jan-20")]
#[case("Xyz-20")]
#[case("Jan-2x")]
#[case("")]
fn test_parse_month_label_rejects_garbage(#[case] label: &str) {
    assert!(matches!(
        parse_month_label(label),
        Err(ForecastError::ParseError(_))
    ));
}

#[test]
fn test_from_records_sorts_by_month() {
    let months = vec![ymd(2021, 3), ymd(2020, 1), ymd(2020, 12)];
    let raw = vec![Some(3.0), Some(1.0), Some(2.0)];

    let series = MonthlySeries::from_records(months, raw).unwrap();

    assert_eq!(
        series.months(),
        &[ymd(2020, 1), ymd(2020, 12), ymd(2021, 3)]
    );
    assert_eq!(series.raw_values(), &[Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn test_from_records_rejects_mismatched_lengths() {
    let result = MonthlySeries::from_records(vec![ymd(2020, 1)], vec![Some(1.0), Some(2.0)]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_from_records_rejects_empty_input() {
    let result = MonthlySeries::from_records(vec![], vec![]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_impute_median_fills_missing_values() {
    let months = (1..=5).map(|m| ymd(2020, m)).collect();
    let raw = vec![Some(10.0), None, Some(30.0), None, Some(20.0)];

    let series = MonthlySeries::from_records(months, raw).unwrap();
    let clean = series.impute_median().unwrap();

    // Median of [10, 30, 20] is 20.
    assert_eq!(clean.values(), &[10.0, 20.0, 30.0, 20.0, 20.0]);
    assert_eq!(clean.len(), 5);
}

#[test]
fn test_impute_median_fails_when_all_missing() {
    let months = (1..=3).map(|m| ymd(2020, m)).collect();
    let series = MonthlySeries::from_records(months, vec![None, None, None]).unwrap();

    assert!(matches!(
        series.impute_median(),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_load_monthly_csv_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month,CMR").unwrap();
    writeln!(file, "Feb-20,3200.5").unwrap();
    writeln!(file, "Jan-20,3100.0").unwrap();
    writeln!(file, "Mar-20,3300.25").unwrap();
    file.flush().unwrap();

    let series = load_monthly_csv(file.path(), &LoaderConfig::default()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.months(), &[ymd(2020, 1), ymd(2020, 2), ymd(2020, 3)]);
    assert_eq!(
        series.raw_values(),
        &[Some(3100.0), Some(3200.5), Some(3300.25)]
    );
}

#[test]
fn test_load_monthly_csv_keeps_uncoercible_cells_as_missing() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month,CMR").unwrap();
    writeln!(file, "Jan-20,3100").unwrap();
    writeln!(file, "Feb-20,N/A").unwrap();
    writeln!(file, "Mar-20,3300").unwrap();
    file.flush().unwrap();

    let series = load_monthly_csv(file.path(), &LoaderConfig::default()).unwrap();

    assert_eq!(
        series.raw_values(),
        &[Some(3100.0), None, Some(3300.0)]
    );

    // Imputation fills the hole with the median of the valid cells.
    let clean = series.impute_median().unwrap();
    assert_eq!(clean.values(), &[3100.0, 3200.0, 3300.0]);
}

#[test]
fn test_load_monthly_csv_ignores_extra_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month,Region,CMR,Notes").unwrap();
    writeln!(file, "Jan-20,North,3100,ok").unwrap();
    writeln!(file, "Feb-20,North,3200,ok").unwrap();
    file.flush().unwrap();

    let series = load_monthly_csv(file.path(), &LoaderConfig::default()).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.raw_values(), &[Some(3100.0), Some(3200.0)]);
}

#[test]
fn test_load_monthly_csv_missing_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month,Demand").unwrap();
    writeln!(file, "Jan-20,3100").unwrap();
    file.flush().unwrap();

    let result = load_monthly_csv(file.path(), &LoaderConfig::default());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_load_monthly_csv_custom_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Period,Demand").unwrap();
    writeln!(file, "Jan-20,3100").unwrap();
    writeln!(file, "Feb-20,3200").unwrap();
    file.flush().unwrap();

    let config = LoaderConfig {
        month_column: "Period".to_string(),
        target_column: "Demand".to_string(),
    };
    let series = load_monthly_csv(file.path(), &config).unwrap();
    assert_eq!(series.len(), 2);
}
