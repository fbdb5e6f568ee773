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

//! Chart rendering and console previews for repaired price data

pub mod chart;
pub mod error;
pub mod preview;

pub use chart::{CHART_HEIGHT, CHART_WIDTH, generate_daily_chart_svg, write_chart};
pub use error::{ReportError, Result};
pub use preview::{daily_table, hourly_table, missing_listing};
