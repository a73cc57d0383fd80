//! Fit the model suite and project demand one year past the test set.
//!
//! Usage: `cargo run --example project_next_year <path/to/demand.csv>`
//!
//! Writes `projection.html` to the working directory.

use cmr_forecast::pipeline::{run_pipeline, PipelineConfig};
use cmr_forecast::plot::projection_figure;
use cmr_forecast::projection::project_year;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = env::args()
        .nth(1)
        .ok_or("usage: project_next_year <demand.csv>")?;

    let config = PipelineConfig::default();
    let run = run_pipeline(&path, &config)?;
    print!("{}", run.report);

    let history = run.split.combined();
    let projection_year = config.boundary_year + 2;
    let projection = project_year(&run.models, &history, projection_year)?;

    println!("Projection for {projection_year}:");
    for (model, values) in &projection.predictions {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        println!("  {model}: mean {mean:.1}");
    }

    projection_figure(&run.report.frames, &projection, config.boundary_year)
        .write_html("projection.html");
    println!("Wrote projection.html");
    Ok(())
}
