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

use anyhow::{Context, Result};
use spotfill_core::{PriceSource, process};
use spotfill_report::{daily_table, hourly_table, missing_listing, write_chart};
use spotfill_store::DailyPriceStore;
use tracing::info;

use crate::config::SpotfillConfig;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub slots: usize,
    pub missing_before_repair: usize,
    pub still_missing: usize,
    pub days: usize,
    pub rows_written: usize,
    pub chart_written: bool,
}

/// Fetch, repair, print previews, write the chart and persist the daily table.
///
/// Nothing is written when the fetch fails.
pub fn run(config: &SpotfillConfig, source: &dyn PriceSource) -> Result<RunSummary> {
    let window = config.window()?;
    let raw = source
        .fetch(&window)
        .with_context(|| format!("Failed to fetch prices for {} to {}", window.start, window.end))?;

    let output = process(&raw, &window, &config.pipeline_options())
        .with_context(|| "Failed to process price data")?;

    let rows = config.output.preview_rows;
    println!("{}", missing_listing(&output.report));
    println!("{}", hourly_table(&output.repaired, rows));
    println!("{}", daily_table(&output.daily, rows));

    let chart_written = write_chart(&config.output.chart_path, &output.daily)
        .with_context(|| "Failed to write chart")?;

    let mut store = DailyPriceStore::open(&config.output.database_path).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.output.database_path.display()
        )
    })?;
    let rows_written = store
        .upsert_all(&output.daily)
        .with_context(|| "Failed to store daily averages")?;
    info!(
        "Stored {} daily rows in {}",
        rows_written,
        config.output.database_path.display()
    );

    Ok(RunSummary {
        slots: output.repaired.len(),
        missing_before_repair: output.report.missing_before_repair.len(),
        still_missing: output.repaired.missing_count(),
        days: output.daily.len(),
        rows_written,
        chart_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use mockito::{Matcher, Server};
    use spotfill_core::{ApiPriceSource, DateWindow, RawPrices, StaticPriceSource};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, base_url: &str) -> SpotfillConfig {
        let mut config = SpotfillConfig::default();
        config.source.base_url = base_url.to_owned();
        config.output.chart_path = dir.path().join("image.svg");
        config.output.database_path = dir.path().join("precios.db");
        config
    }

    fn payload(window: &DateWindow, skip: Option<NaiveDate>) -> RawPrices {
        let mut raw = RawPrices::new();
        for date in window.days().filter(|d| Some(*d) != skip) {
            let hours = raw.entry(date.format("%Y-%m-%d").to_string()).or_default();
            for hour in 0..24_u32 {
                hours.insert(
                    format!("{hour:02}:00"),
                    Some(f64::from(date.day()) + f64::from(hour) / 100.0),
                );
            }
        }
        raw
    }

    #[test]
    fn test_run_against_http_source() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new();
        let config = config_in(&dir, &format!("{}/precios", server.url()));
        let window = config.window().unwrap();
        let missing = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let body = serde_json::json!({ "data": payload(&window, Some(missing)) });

        let mock = server
            .mock("GET", "/precios")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2024-03-15".into()),
                Matcher::UrlEncoded("end_date".into(), "2024-04-14".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let source = ApiPriceSource::new(config.source.base_url.clone(), config.timeout()).unwrap();
        let summary = run(&config, &source).unwrap();
        mock.assert();

        assert_eq!(
            summary,
            RunSummary {
                slots: 744,
                missing_before_repair: 24,
                still_missing: 0,
                days: 31,
                rows_written: 31,
                chart_written: true,
            }
        );
        assert!(config.output.chart_path.exists());

        let stored = DailyPriceStore::open(&config.output.database_path)
            .unwrap()
            .load_all()
            .unwrap();
        assert_eq!(stored.len(), 31);
        let repaired = stored.iter().find(|d| d.date == missing).unwrap();
        // neighbors 17..19 and 21..23 average to day 20 plus the mean hour offset
        let expected = 20.0 + 11.5 / 100.0;
        assert!((repaired.daily_average.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_failed_fetch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/precios")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();
        let config = config_in(&dir, &format!("{}/precios", server.url()));

        let source = ApiPriceSource::new(config.source.base_url.clone(), None).unwrap();
        let err = run(&config, &source).unwrap_err();
        mock.assert();

        assert!(err.to_string().contains("Failed to fetch prices"));
        assert!(!config.output.chart_path.exists());
        assert!(!config.output.database_path.exists());
    }

    #[test]
    fn test_repeated_runs_keep_one_row_per_day() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "http://unused.invalid/precios");
        let window = config.window().unwrap();

        let first = StaticPriceSource::new(payload(&window, None));
        run(&config, &first).unwrap();

        let mut shifted = payload(&window, None);
        for hours in shifted.values_mut() {
            for price in hours.values_mut() {
                *price = price.map(|p| p + 100.0);
            }
        }
        let second = StaticPriceSource::new(shifted);
        let summary = run(&config, &second).unwrap();
        assert_eq!(summary.rows_written, 31);

        let store = DailyPriceStore::open(&config.output.database_path).unwrap();
        assert_eq!(store.count().unwrap(), 31);
        let first_day = &store.load_all().unwrap()[0];
        assert!((first_day.daily_average.unwrap() - (115.0 + 11.5 / 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_payload_stores_unknown_days() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "http://unused.invalid/precios");

        let summary = run(&config, &StaticPriceSource::new(RawPrices::new())).unwrap();

        assert_eq!(summary.still_missing, 744);
        assert!(!summary.chart_written);
        let stored = DailyPriceStore::open(&config.output.database_path)
            .unwrap()
            .load_all()
            .unwrap();
        assert_eq!(stored.len(), 31);
        assert!(stored.iter().all(|d| d.daily_average.is_none()));
    }
}
