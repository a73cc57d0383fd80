//! Plotly figures for the comparison and projection passes.
//!
//! All builders return in-memory [`Plot`] values; nothing is persisted here.
//! Callers (the demo programs) decide whether to write HTML.

use crate::pipeline::{ModelReport, PredictionFrame};
use crate::projection::ProjectionFrame;
use chrono::NaiveDate;
use plotly::color::NamedColor;
use plotly::common::{DashType, Fill, Line, Mode, Orientation, Title};
use plotly::layout::{GridPattern, Layout, LayoutGrid, Legend, RowOrder};
use plotly::{Plot, Scatter};

const MODEL_COLORS: [NamedColor; 4] = [
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Purple,
    NamedColor::Blue,
];
const METRIC_COLORS: [NamedColor; 4] = [
    NamedColor::Red,
    NamedColor::Blue,
    NamedColor::Green,
    NamedColor::Black,
];

fn month_labels(months: &[NaiveDate]) -> Vec<String> {
    months
        .iter()
        .map(|m| m.format("%Y-%m-%d").to_string())
        .collect()
}

fn color_for(index: usize) -> NamedColor {
    MODEL_COLORS[index % MODEL_COLORS.len()]
}

/// Vertical dashed marker at `month`, spanning slightly past the value range.
fn boundary_marker(month: NaiveDate, lo: f64, hi: f64, axis: usize) -> Box<Scatter<String, f64>> {
    let label = month.format("%Y-%m-%d").to_string();
    Scatter::new(vec![label.clone(), label], vec![lo * 0.9, hi * 1.1])
        .mode(Mode::Lines)
        .line(Line::new().color(NamedColor::Gray).dash(DashType::Dash))
        .show_legend(false)
        .x_axis(format!("x{axis}"))
        .y_axis(format!("y{axis}"))
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

/// One panel per model: the actual series, the prediction from the test
/// boundary onward, and a dashed marker at the boundary.
pub fn forecast_figure(frames: &[PredictionFrame], boundary_year: i32) -> Plot {
    let boundary = NaiveDate::from_ymd_opt(boundary_year + 1, 1, 1)
        .expect("January 1 exists for every year");
    let mut plot = Plot::new();

    for (i, frame) in frames.iter().enumerate() {
        let axis = i + 1;
        let labels = month_labels(&frame.months);
        let (lo, hi) = value_range(&frame.actual);

        plot.add_trace(
            Scatter::new(labels.clone(), frame.actual.clone())
                .mode(Mode::LinesMarkers)
                .name("Actual")
                .line(Line::new().color(NamedColor::Black))
                .show_legend(i == 0)
                .x_axis(format!("x{axis}"))
                .y_axis(format!("y{axis}")),
        );

        // Predictions are only drawn from the boundary onward; the training
        // span would just overplot the actual line.
        let (pred_labels, pred_values): (Vec<String>, Vec<f64>) = frame
            .months
            .iter()
            .zip(frame.predicted.iter())
            .filter(|(month, _)| **month >= boundary)
            .map(|(month, value)| (month.format("%Y-%m-%d").to_string(), *value))
            .unzip();

        plot.add_trace(
            Scatter::new(pred_labels, pred_values)
                .mode(Mode::LinesMarkers)
                .name(frame.model.as_str())
                .line(Line::new().color(color_for(i)))
                .fill(Fill::ToZeroY)
                .x_axis(format!("x{axis}"))
                .y_axis(format!("y{axis}")),
        );

        plot.add_trace(boundary_marker(boundary, lo, hi, axis));
    }

    let rows = frames.len().div_ceil(2);
    let layout = Layout::new()
        .title(Title::with_text("Model Predictions vs Actual"))
        .grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(2)
                .pattern(GridPattern::Independent)
                .row_order(RowOrder::TopToBottom),
        )
        .show_legend(true)
        .legend(Legend::new().orientation(Orientation::Horizontal));

    plot.set_layout(layout);
    plot
}

/// 2x2 grid comparing the four metrics across models.
pub fn metrics_figure(reports: &[ModelReport]) -> Plot {
    let names: Vec<String> = reports.iter().map(|r| r.model.clone()).collect();
    let panels: [(&str, Vec<f64>); 4] = [
        ("MAPE", reports.iter().map(|r| r.metrics.mape).collect()),
        ("RMSE", reports.iter().map(|r| r.metrics.rmse).collect()),
        ("R² Score", reports.iter().map(|r| r.metrics.r2).collect()),
        ("MAE", reports.iter().map(|r| r.metrics.mae).collect()),
    ];

    let mut plot = Plot::new();
    for (i, (metric, values)) in panels.into_iter().enumerate() {
        let axis = i + 1;
        plot.add_trace(
            Scatter::new(names.clone(), values)
                .mode(Mode::LinesMarkers)
                .name(metric)
                .line(Line::new().color(METRIC_COLORS[i]).dash(DashType::Dash))
                .x_axis(format!("x{axis}"))
                .y_axis(format!("y{axis}")),
        );
    }

    let layout = Layout::new()
        .title(Title::with_text("Comparison of Model Performance Metrics"))
        .grid(
            LayoutGrid::new()
                .rows(2)
                .columns(2)
                .pattern(GridPattern::Independent)
                .row_order(RowOrder::TopToBottom),
        )
        .show_legend(true);

    plot.set_layout(layout);
    plot
}

/// History plus the projected year: per model, the evaluated predictions from
/// the test boundary onward and the forward-year projection, with dashed
/// markers at both year starts.
pub fn projection_figure(
    frames: &[PredictionFrame],
    projection: &ProjectionFrame,
    boundary_year: i32,
) -> Plot {
    let test_start = NaiveDate::from_ymd_opt(boundary_year + 1, 1, 1)
        .expect("January 1 exists for every year");
    let projection_start = projection.months.first().copied().unwrap_or(test_start);
    let projection_labels = month_labels(&projection.months);

    let mut plot = Plot::new();
    for (i, frame) in frames.iter().enumerate() {
        let axis = i + 1;
        let labels = month_labels(&frame.months);
        let (lo, hi) = value_range(&frame.actual);

        plot.add_trace(
            Scatter::new(labels.clone(), frame.actual.clone())
                .mode(Mode::LinesMarkers)
                .name("Actual")
                .line(Line::new().color(NamedColor::Black))
                .show_legend(i == 0)
                .x_axis(format!("x{axis}"))
                .y_axis(format!("y{axis}")),
        );

        let (pred_labels, pred_values): (Vec<String>, Vec<f64>) = frame
            .months
            .iter()
            .zip(frame.predicted.iter())
            .filter(|(month, _)| **month >= test_start)
            .map(|(month, value)| (month.format("%Y-%m-%d").to_string(), *value))
            .unzip();

        plot.add_trace(
            Scatter::new(pred_labels, pred_values)
                .mode(Mode::LinesMarkers)
                .name(frame.model.as_str())
                .line(Line::new().color(color_for(i)))
                .x_axis(format!("x{axis}"))
                .y_axis(format!("y{axis}")),
        );

        if let Some((_, values)) = projection
            .predictions
            .iter()
            .find(|(name, _)| *name == frame.model)
        {
            plot.add_trace(
                Scatter::new(projection_labels.clone(), values.clone())
                    .mode(Mode::LinesMarkers)
                    .name(format!("{} (projected)", frame.model))
                    .line(Line::new().color(color_for(i)))
                    .opacity(0.5)
                    .x_axis(format!("x{axis}"))
                    .y_axis(format!("y{axis}")),
            );
        }

        plot.add_trace(boundary_marker(test_start, lo, hi, axis));
        plot.add_trace(boundary_marker(projection_start, lo, hi, axis));
    }

    let rows = frames.len().div_ceil(2);
    let layout = Layout::new()
        .title(Title::with_text("Forward Projection"))
        .grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(2)
                .pattern(GridPattern::Independent)
                .row_order(RowOrder::TopToBottom),
        )
        .show_legend(true)
        .legend(Legend::new().orientation(Orientation::Horizontal));

    plot.set_layout(layout);
    plot
}
