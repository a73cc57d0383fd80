use chrono::{Datelike, NaiveDate};
use cmr_forecast::pipeline::{run_pipeline, PipelineConfig};
use cmr_forecast::projection::{project_year, PROJECTION_MONTHS};
use std::io::Write;
use tempfile::NamedTempFile;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Four years of seasonal demand, Jan-20 through Dec-23, with a few messy
/// cells the cleaner has to impute.
fn demand_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month,CMR").unwrap();
    for year in 20..=23 {
        for (m, label) in MONTHS.iter().enumerate() {
            let t = (year - 20) as f64 * 12.0 + m as f64;
            let value = 3000.0 + 8.0 * t + 400.0 * (m as f64 / 12.0 * std::f64::consts::TAU).sin();
            if year == 21 && m == 5 {
                writeln!(file, "{label}-{year},N/A").unwrap();
            } else {
                writeln!(file, "{label}-{year},{value:.1}").unwrap();
            }
        }
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_full_pipeline_run() {
    let file = demand_csv();
    let config = PipelineConfig::default();
    let run = run_pipeline(file.path(), &config).unwrap();

    // 48 input rows all survive feature building; 36 train, 12 test.
    assert_eq!(run.split.train.len(), 36);
    assert_eq!(run.split.test.len(), 12);

    assert_eq!(run.models.len(), 4);
    assert_eq!(run.report.frames.len(), 4);
    assert_eq!(run.report.reports.len(), 4);
    assert_eq!(run.report.boundary_year, 2022);

    for frame in &run.report.frames {
        assert_eq!(frame.len(), 48);
        assert_eq!(frame.actual.len(), frame.predicted.len());
        assert!(frame.predicted.iter().all(|p| p.is_finite()));
        assert!(frame.months.windows(2).all(|w| w[0] < w[1]));
    }

    for report in &run.report.reports {
        assert!(report.metrics.mape.is_finite());
        assert!(report.metrics.rmse >= 0.0);
        assert!(report.metrics.mae >= 0.0);
        assert!(report.metrics.r2 <= 1.0);
    }
}

#[test]
fn test_models_fit_the_training_years_well() {
    let file = demand_csv();
    let run = run_pipeline(file.path(), &PipelineConfig::default()).unwrap();

    // The series is smooth and seasonal; no model should do worse than a
    // mean-level fit over the full train-then-test span.
    for report in &run.report.reports {
        assert!(
            report.metrics.r2 > -0.5,
            "{} scored R² {}",
            report.model,
            report.metrics.r2
        );
        assert!(
            report.metrics.mape < 25.0,
            "{} scored MAPE {}",
            report.model,
            report.metrics.mape
        );
    }

    // The tree ensembles memorize the training years almost exactly.
    let gb = &run.report.reports[0];
    assert!(gb.metrics.r2 > 0.5, "{} scored R² {}", gb.model, gb.metrics.r2);
}

#[test]
fn test_report_display_and_serialization() {
    let file = demand_csv();
    let run = run_pipeline(file.path(), &PipelineConfig::default()).unwrap();

    let printed = format!("{}", run.report);
    assert_eq!(printed.matches("Model Performance:").count(), 4);
    assert!(printed.contains("Mean Absolute Percentage Error (MAPE):"));

    let json = run.report.to_json().unwrap();
    assert!(json.contains("\"boundary_year\": 2022"));
    assert!(json.contains("\"mape\""));
}

#[test]
fn test_results_csv_export() {
    let file = demand_csv();
    let run = run_pipeline(file.path(), &PipelineConfig::default()).unwrap();

    let out = NamedTempFile::new().unwrap();
    run.report.write_results_csv(out.path()).unwrap();

    let contents = std::fs::read_to_string(out.path()).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Month,Actual,"));
    assert_eq!(header.split(',').count(), 2 + run.report.frames.len());
    assert_eq!(lines.count(), 48);
}

#[test]
fn test_projection_of_the_following_year() {
    let file = demand_csv();
    let config = PipelineConfig::default();
    let run = run_pipeline(file.path(), &config).unwrap();

    let history = run.split.combined();
    let projection = project_year(&run.models, &history, 2024).unwrap();

    assert_eq!(projection.months.len(), PROJECTION_MONTHS);
    assert!(projection.months.iter().all(|m| m.year() == 2024));
    assert_eq!(projection.months[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(projection.months[11], NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());

    assert_eq!(projection.predictions.len(), 4);
    for (model, values) in &projection.predictions {
        assert_eq!(values.len(), PROJECTION_MONTHS, "{model}");
        assert!(values.iter().all(|v| v.is_finite()), "{model}");
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let file = demand_csv();
    let config = PipelineConfig::default();

    let first = run_pipeline(file.path(), &config).unwrap();
    let second = run_pipeline(file.path(), &config).unwrap();

    for (a, b) in first.report.frames.iter().zip(second.report.frames.iter()) {
        assert_eq!(a.model, b.model);
        assert_eq!(a.predicted, b.predicted);
    }
}

#[test]
fn test_projection_requires_fitted_models() {
    let file = demand_csv();
    let run = run_pipeline(file.path(), &PipelineConfig::default()).unwrap();
    let history = run.split.combined();

    assert!(project_year(&[], &history, 2024).is_err());
}
