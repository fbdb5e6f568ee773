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

//! Spotfill core
//!
//! Hourly spot price ingestion and gap repair.
//!
//! ## Stages
//!
//! - **Fetch**: [`pricing::PriceSource`] returns the raw date → hour → price map
//! - **Normalize**: [`normalize::normalize`] turns it into sorted observations
//! - **Repair**: [`repair::repair`] joins observations with the [`grid::HourlyGrid`]
//!   and fills missing hours and missing days
//! - **Aggregate**: [`aggregate::aggregate`] computes daily and 7-day rolling means
//!
//! Every stage takes the previous stage's output by reference and returns a new value.

pub mod aggregate;
pub mod error;
pub mod grid;
pub mod normalize;
pub mod pipeline;
pub mod pricing;
pub mod repair;
pub mod types;

pub use aggregate::{ROLLING_WINDOW_DAYS, aggregate, daily_averages, rolling_mean};
pub use error::{Result, SpotfillError};
pub use grid::HourlyGrid;
pub use normalize::{MidnightPolicy, NormalizedPrices, normalize};
pub use pipeline::{PipelineOptions, PipelineOutput, process};
pub use pricing::{ApiPriceSource, DEFAULT_BASE_URL, PriceSource, StaticPriceSource};
pub use repair::{DEFAULT_NEIGHBOR_DAYS, RepairOptions, WholeDayDetection, repair};
pub use types::*;
