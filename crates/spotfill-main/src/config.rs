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

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use spotfill_core::{
    DEFAULT_BASE_URL, DEFAULT_NEIGHBOR_DAYS, DateWindow, MidnightPolicy, PipelineOptions,
    RepairOptions, WholeDayDetection,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotfillConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub range: RangeSettings,
    #[serde(default)]
    pub repair: RepairSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Dates are TOML strings, e.g. `start_date = "2024-03-15"`
#[derive(Debug, Clone, Deserialize)]
pub struct RangeSettings {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepairSettings {
    #[serde(default)]
    pub midnight: MidnightPolicy,
    #[serde(default)]
    pub detection: WholeDayDetection,
    #[serde(default = "default_neighbor_days")]
    pub neighbor_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or(NaiveDate::MIN)
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 14).unwrap_or(NaiveDate::MIN)
}

fn default_neighbor_days() -> u32 {
    DEFAULT_NEIGHBOR_DAYS
}

fn default_chart_path() -> PathBuf {
    PathBuf::from("image.svg")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("precios.db")
}

fn default_preview_rows() -> usize {
    30
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
        }
    }
}

impl Default for RepairSettings {
    fn default() -> Self {
        Self {
            midnight: MidnightPolicy::default(),
            detection: WholeDayDetection::default(),
            neighbor_days: default_neighbor_days(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            chart_path: default_chart_path(),
            database_path: default_database_path(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl SpotfillConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config TOML")
    }

    /// Config file (if any) overlaid with command-line flags, then validated
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(start) = cli.start {
            self.range.start_date = start;
        }
        if let Some(end) = cli.end {
            self.range.end_date = end;
        }
        if let Some(base_url) = &cli.base_url {
            self.source.base_url.clone_from(base_url);
        }
        if let Some(database) = &cli.database {
            self.output.database_path.clone_from(database);
        }
        if let Some(chart) = &cli.chart {
            self.output.chart_path.clone_from(chart);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.range.end_date < self.range.start_date {
            bail!(
                "range.end_date ({}) must not be before range.start_date ({})",
                self.range.end_date,
                self.range.start_date
            );
        }
        if self.source.base_url.trim().is_empty() {
            bail!("source.base_url must be set");
        }
        if self.repair.neighbor_days == 0 {
            bail!("repair.neighbor_days must be at least 1");
        }
        Ok(())
    }

    pub fn window(&self) -> Result<DateWindow> {
        DateWindow::new(self.range.start_date, self.range.end_date)
            .with_context(|| "Invalid date range")
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.source.timeout_secs.map(Duration::from_secs)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            midnight: self.repair.midnight,
            repair: RepairOptions {
                detection: self.repair.detection,
                neighbor_days: self.repair.neighbor_days,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_reproduce_fixed_run() {
        let config = SpotfillConfig::default();
        config.validate().unwrap();

        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.range.start_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(config.range.end_date, NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
        assert_eq!(config.output.chart_path, PathBuf::from("image.svg"));
        assert_eq!(config.output.database_path, PathBuf::from("precios.db"));
        assert_eq!(config.output.preview_rows, 30);
        assert_eq!(config.pipeline_options(), PipelineOptions::default());
        assert_eq!(config.window().unwrap().day_count(), 31);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[range]
start_date = "2024-01-01"
end_date = "2024-01-07"

[repair]
midnight = "same-day"
detection = "after-fill"
"#,
        );

        let config = SpotfillConfig::from_file(file.path()).unwrap();
        assert_eq!(config.range.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.repair.midnight, MidnightPolicy::SameDay);
        assert_eq!(config.repair.detection, WholeDayDetection::AfterFill);
        assert_eq!(config.repair.neighbor_days, DEFAULT_NEIGHBOR_DAYS);
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output.database_path, PathBuf::from("precios.db"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config(
            r#"
[source]
base_url = "http://file.example/precios"
timeout_secs = 10

[output]
database_path = "file.db"
"#,
        );
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "spotfill",
            "--config",
            path,
            "--database",
            "cli.db",
            "--end",
            "2024-03-20",
        ])
        .unwrap();

        let config = SpotfillConfig::load(&cli).unwrap();
        assert_eq!(config.source.base_url, "http://file.example/precios");
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.output.database_path, PathBuf::from("cli.db"));
        assert_eq!(config.range.end_date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(config.window().unwrap().day_count(), 6);
    }

    #[test]
    fn test_validation_failures() {
        let cli = Cli::try_parse_from(["spotfill", "--start", "2024-05-01"]).unwrap();
        let err = SpotfillConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("range.end_date"));

        let mut config = SpotfillConfig::default();
        config.source.base_url = "  ".to_owned();
        assert!(config.validate().is_err());

        let mut config = SpotfillConfig::default();
        config.repair.neighbor_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        assert!(SpotfillConfig::from_file(Path::new("/nonexistent/spotfill.toml")).is_err());

        let file = write_config("[repair]\nmidnight = \"tomorrow\"\n");
        assert!(SpotfillConfig::from_file(file.path()).is_err());
    }
}
