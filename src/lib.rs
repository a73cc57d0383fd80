//! # CMR Forecast
//!
//! A Rust library for monthly commodity demand forecasting and model comparison.
//!
//! ## Features
//!
//! - Monthly CSV ingestion with `Mon-YY` labels and messy target cells
//! - Median imputation and lag-based feature engineering
//! - Chronological train/test partitioning by calendar year
//! - Four regressors: gradient boosting, oblivious boosting, RBF kernel
//!   ridge, and a seeded random forest
//! - MAPE / RMSE / R² / MAE scoring with per-model reports
//! - Forward projection of the next calendar year
//! - Plotly figures for predictions, metrics, and projections
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmr_forecast::pipeline::{run_pipeline, PipelineConfig};
//! use cmr_forecast::projection::project_year;
//!
//! # fn main() -> cmr_forecast::Result<()> {
//! let config = PipelineConfig::default();
//! let run = run_pipeline("demand.csv", &config)?;
//!
//! // Print per-model metrics
//! print!("{}", run.report);
//!
//! // Project the year after the test set
//! let history = run.split.combined();
//! let projection = project_year(&run.models, &history, config.boundary_year + 2)?;
//! println!("projected {} months", projection.months.len());
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod plot;
pub mod projection;
pub mod split;

// Re-export commonly used types
pub use crate::data::{CleanSeries, LoaderConfig, MonthlySeries};
pub use crate::error::{ForecastError, Result};
pub use crate::features::FeatureTable;
pub use crate::metrics::ForecastMetrics;
pub use crate::models::{FittedModel, ModelSpec};
pub use crate::pipeline::{ComparisonReport, PipelineConfig, PipelineRun};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
