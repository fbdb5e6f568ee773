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

use tracing::info;

use crate::aggregate::aggregate;
use crate::error::Result;
use crate::grid::HourlyGrid;
use crate::normalize::{MidnightPolicy, NormalizedPrices, normalize};
use crate::repair::{RepairOptions, repair};
use crate::types::{DailyAggregate, DateWindow, RawPrices, RepairReport, RepairedSeries};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub midnight: MidnightPolicy,
    pub repair: RepairOptions,
}

/// Every intermediate result of one run, kept for reporting
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub normalized: NormalizedPrices,
    pub repaired: RepairedSeries,
    pub report: RepairReport,
    pub daily: Vec<DailyAggregate>,
}

/// Normalize, repair and aggregate a raw price payload for `window`
pub fn process(
    raw: &RawPrices,
    window: &DateWindow,
    options: &PipelineOptions,
) -> Result<PipelineOutput> {
    let normalized = normalize(raw, options.midnight)?;
    let grid = HourlyGrid::new(window);
    info!(
        "Normalized {} observations against a grid of {} hourly slots",
        normalized.observations.len(),
        grid.len()
    );

    let (repaired, report) = repair(&normalized.observations, &grid, &options.repair);
    let daily = aggregate(&repaired);

    Ok(PipelineOutput {
        normalized,
        repaired,
        report,
        daily,
    })
}
