//! The end-to-end comparison pipeline.
//!
//! Explicit function composition over an immutable dataset: load → impute →
//! build lag features → split by year → fit each configured model → predict
//! over train-then-test → score. Any failure aborts the run; there is no
//! partial-result mode.

use crate::data::{load_monthly_csv, LoaderConfig};
use crate::error::{ForecastError, Result};
use crate::features::{build_lag_features, DEFAULT_LAGS};
use crate::metrics::{evaluate_forecast, ForecastMetrics};
use crate::models::{default_suite, FittedModel, ModelSpec};
use crate::split::{split_by_year, TrainTestSplit};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Fixed parameters of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Column names for the loader
    pub loader: LoaderConfig,
    /// Last training year Y; the test set is year Y+1
    pub boundary_year: i32,
    /// Number of lag features
    pub lags: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            boundary_year: 2022,
            lags: DEFAULT_LAGS,
        }
    }
}

/// One model's predictions over the train-then-test rows, aligned by month
#[derive(Debug, Clone, Serialize)]
pub struct PredictionFrame {
    /// Model name
    pub model: String,
    /// Months, train rows first, then test rows
    pub months: Vec<NaiveDate>,
    /// Actual target values
    pub actual: Vec<f64>,
    /// Predicted target values
    pub predicted: Vec<f64>,
}

impl PredictionFrame {
    /// Number of rows in the frame
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Check if the frame is empty
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Per-model metric bundle
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    /// Model name
    pub model: String,
    /// Metrics against the full actual series
    pub metrics: ForecastMetrics,
}

/// Results of one comparison pass over all configured models
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// One frame per model, in suite order
    pub frames: Vec<PredictionFrame>,
    /// One metric bundle per model, in suite order
    pub reports: Vec<ModelReport>,
    /// The boundary year the split used
    pub boundary_year: i32,
}

/// Everything a run produces: the split, the fitted models, and the report.
#[derive(Debug)]
pub struct PipelineRun {
    /// The train/test partition the models were fitted on
    pub split: TrainTestSplit,
    /// Fitted models, in suite order
    pub models: Vec<FittedModel>,
    /// The comparison report
    pub report: ComparisonReport,
}

/// Load, clean, and feature-build a CSV, then partition it.
pub fn prepare_dataset<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<TrainTestSplit> {
    let series = load_monthly_csv(path, &config.loader)?;
    info!(rows = series.len(), "loaded monthly series");

    let clean = series.impute_median()?;
    let table = build_lag_features(&clean, config.lags)?;
    info!(rows = table.len(), lags = config.lags, "built lag features");

    let split = split_by_year(&table, config.boundary_year)?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        boundary = config.boundary_year,
        "partitioned dataset"
    );

    Ok(split)
}

/// Fit every model of the suite on the training partition.
pub fn fit_suite(suite: &[ModelSpec], split: &TrainTestSplit) -> Result<Vec<FittedModel>> {
    suite
        .iter()
        .map(|spec| {
            let started = Instant::now();
            let fitted = spec.fit(split.train.rows(), split.train.target())?;
            info!(
                model = spec.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "fitted model"
            );
            Ok(fitted)
        })
        .collect()
}

/// Predict over train-then-test with every fitted model and score the results.
pub fn evaluate_suite(
    models: &[FittedModel],
    split: &TrainTestSplit,
) -> Result<ComparisonReport> {
    let combined = split.combined();
    let months = combined.months().to_vec();
    let actual = combined.target().to_vec();

    let mut frames = Vec::with_capacity(models.len());
    let mut reports = Vec::with_capacity(models.len());

    for model in models {
        let predicted = model.predict(combined.rows())?;
        let metrics = evaluate_forecast(&actual, &predicted)?;
        info!(model = model.name(), mape = metrics.mape, "evaluated model");

        reports.push(ModelReport {
            model: model.name().to_string(),
            metrics,
        });
        frames.push(PredictionFrame {
            model: model.name().to_string(),
            months: months.clone(),
            actual: actual.clone(),
            predicted,
        });
    }

    Ok(ComparisonReport {
        frames,
        reports,
        boundary_year: split.boundary_year,
    })
}

/// Run the whole pipeline on a CSV file with the default model suite.
pub fn run_pipeline<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<PipelineRun> {
    let split = prepare_dataset(path, config)?;
    let models = fit_suite(&default_suite(), &split)?;
    let report = evaluate_suite(&models, &split)?;

    Ok(PipelineRun {
        split,
        models,
        report,
    })
}

impl ComparisonReport {
    /// Serialize the report to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::DataError(format!("JSON serialization failed: {e}")))
    }

    /// Write the combined results frame (month, actual, one prediction column
    /// per model) to a CSV file.
    pub fn write_results_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let first = self.frames.first().ok_or_else(|| {
            ForecastError::DataError("report holds no prediction frames".to_string())
        })?;

        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| ForecastError::DataError(format!("csv writer: {e}")))?;

        let mut header = vec!["Month".to_string(), "Actual".to_string()];
        header.extend(self.frames.iter().map(|f| f.model.clone()));
        writer
            .write_record(&header)
            .map_err(|e| ForecastError::DataError(format!("csv write: {e}")))?;

        for row in 0..first.len() {
            let mut record = vec![
                first.months[row].format("%Y-%m-%d").to_string(),
                format!("{:.6}", first.actual[row]),
            ];
            record.extend(
                self.frames
                    .iter()
                    .map(|f| format!("{:.6}", f.predicted[row])),
            );
            writer
                .write_record(&record)
                .map_err(|e| ForecastError::DataError(format!("csv write: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| ForecastError::DataError(format!("csv flush: {e}")))?;
        Ok(())
    }
}

impl std::fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for report in &self.reports {
            writeln!(f, "{} Model Performance:", report.model)?;
            write!(f, "{}", report.metrics)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
