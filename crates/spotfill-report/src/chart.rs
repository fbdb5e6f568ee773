// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Spotfill.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use plotters::prelude::*;
use spotfill_core::DailyAggregate;
use tracing::{info, warn};

use crate::error::{ReportError, Result};

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 600;

const DAILY_COLOR: RGBColor = RGBColor(33, 150, 243);
const ROLLING_COLOR: RGBColor = RGBColor(255, 152, 0);

type Point = (DateTime<Utc>, f64);

fn chart_error<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Chart(err.to_string())
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Consecutive runs of known values; a missing value breaks the line
fn segments(days: &[DailyAggregate], value: impl Fn(&DailyAggregate) -> Option<f64>) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for day in days {
        match value(day) {
            Some(price) => current.push((at_midnight(day.date), price)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Render daily averages and their 7-day rolling mean as an SVG line chart.
///
/// Returns an empty string when no day has a known value.
///
/// # Errors
/// Returns error if chart generation fails
pub fn generate_daily_chart_svg(days: &[DailyAggregate], width: u32, height: u32) -> Result<String> {
    let mut svg_data = String::new();

    let daily = segments(days, |d| d.daily_average);
    let rolling = segments(days, |d| d.rolling_average);

    let values: Vec<f64> = daily.iter().chain(&rolling).flatten().map(|(_, v)| *v).collect();
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return Ok(svg_data);
    };
    if values.is_empty() {
        return Ok(svg_data);
    }

    let min_price = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let padding = if max_price > min_price {
        (max_price - min_price) * 0.1
    } else {
        1.0
    };

    let first_time = at_midnight(first.date);
    let mut last_time = at_midnight(last.date);
    if last_time <= first_time {
        last_time = first_time + TimeDelta::days(1);
    }

    {
        let root = SVGBackend::with_string(&mut svg_data, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Daily average and 7-day rolling average", ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(80)
            .y_label_area_size(60)
            .build_cartesian_2d(first_time..last_time, (min_price - padding)..(max_price + padding))
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price")
            .x_labels(days.len().min(31))
            .y_labels(10)
            .x_label_formatter(&|dt| dt.format("%Y-%m-%d").to_string())
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .draw()
            .map_err(chart_error)?;

        for (index, segment) in daily.iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(
                    segment.iter().copied(),
                    DAILY_COLOR.stroke_width(2),
                ))
                .map_err(chart_error)?;
            if index == 0 {
                series.label("Daily average").legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], DAILY_COLOR.stroke_width(2))
                });
            }
        }
        chart
            .draw_series(
                daily
                    .iter()
                    .flatten()
                    .map(|&point| Circle::new(point, 3, DAILY_COLOR.filled())),
            )
            .map_err(chart_error)?;

        for (index, segment) in rolling.iter().enumerate() {
            let series = chart
                .draw_series(DashedLineSeries::new(
                    segment.iter().copied(),
                    6,
                    4,
                    ROLLING_COLOR.stroke_width(2),
                ))
                .map_err(chart_error)?;
            if index == 0 {
                series.label("7-day rolling average").legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], ROLLING_COLOR.stroke_width(2))
                });
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    } // root is dropped here, releasing the borrow on svg_data

    Ok(svg_data)
}

/// Render the chart and write it to `path`, creating parent directories.
///
/// Returns `false` without touching the filesystem when there is nothing to plot.
///
/// # Errors
/// Returns error if rendering or writing fails
pub fn write_chart(path: &Path, days: &[DailyAggregate]) -> Result<bool> {
    let svg = generate_daily_chart_svg(days, CHART_WIDTH, CHART_HEIGHT)?;
    if svg.is_empty() {
        warn!("No daily averages to plot, skipping chart {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, svg).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Chart written to {}", path.display());
    Ok(true)
}
