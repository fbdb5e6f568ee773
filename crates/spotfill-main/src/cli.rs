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

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "spotfill")]
#[command(about = "Fetch hourly spot prices, repair gaps and store daily averages", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Price API endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to the SQLite database (will be created if it doesn't exist)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Where to write the SVG chart
    #[arg(long)]
    pub chart: Option<PathBuf>,
}
