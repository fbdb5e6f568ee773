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

//! Gap repair of the hourly price series
//!
//! Observations are joined onto the [`HourlyGrid`]. Missing hours are filled by
//! carrying the last known price forward, and days without any observation get
//! the mean price of their neighbor days.

use std::ops::Range;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregate::mean;
use crate::grid::HourlyGrid;
use crate::types::{HourlySlot, PriceObservation, RepairReport, RepairedSeries, SlotSource};

/// Days on each side of an empty day used for its average
pub const DEFAULT_NEIGHBOR_DAYS: u32 = 3;

/// When days without prices are detected relative to forward-fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WholeDayDetection {
    /// Detect on the raw observations. Forward-fill never enters an empty day,
    /// so every such day gets the neighbor average of observed prices.
    #[default]
    BeforeFill,
    /// Forward-fill the whole series first and average only the days that are
    /// still empty afterwards, using the filled prices of their neighbors.
    AfterFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    pub detection: WholeDayDetection,
    pub neighbor_days: u32,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            detection: WholeDayDetection::default(),
            neighbor_days: DEFAULT_NEIGHBOR_DAYS,
        }
    }
}

type DayRange = (NaiveDate, Range<usize>);

/// Join `observations` onto `grid` and fill the gaps.
///
/// Leading slots before the first known price stay missing; there is no
/// backward fill. A day without observations and without any price within
/// `neighbor_days` on either side also stays missing and is listed in
/// [`RepairReport::unrepaired_days`].
#[must_use]
pub fn repair(
    observations: &[PriceObservation],
    grid: &HourlyGrid,
    options: &RepairOptions,
) -> (RepairedSeries, RepairReport) {
    let mut observed: Vec<Option<f64>> = vec![None; grid.len()];
    let mut outside_grid = 0;
    for observation in observations {
        match grid.index_of(observation.timestamp) {
            Some(index) => observed[index] = Some(observation.price),
            None => outside_grid += 1,
        }
    }
    if outside_grid > 0 {
        warn!("Ignored {} observations outside the hourly grid", outside_grid);
    }

    let missing_before_repair: Vec<NaiveDateTime> = grid
        .slots()
        .iter()
        .zip(&observed)
        .filter(|(_, price)| price.is_none())
        .map(|(timestamp, _)| *timestamp)
        .collect();

    let mut slots: Vec<HourlySlot> = grid
        .slots()
        .iter()
        .zip(&observed)
        .map(|(&timestamp, &price)| HourlySlot {
            timestamp,
            price,
            source: if price.is_some() {
                SlotSource::Observed
            } else {
                SlotSource::Missing
            },
        })
        .collect();

    let days = grid.day_ranges();
    let mut imputed_days = Vec::new();
    let mut unrepaired_days = Vec::new();

    let forward_filled = match options.detection {
        WholeDayDetection::BeforeFill => {
            let empty_days: Vec<usize> = (0..days.len())
                .filter(|&day| is_empty(&observed, &days[day].1))
                .collect();

            let mut in_empty_day = vec![false; slots.len()];
            for &day in &empty_days {
                in_empty_day[days[day].1.clone()].fill(true);
            }
            let filled = forward_fill(&mut slots, |index| !in_empty_day[index]);

            for day in empty_days {
                match neighbor_average(&observed, &days, day, options.neighbor_days) {
                    Some(value) => {
                        assign_day(&mut slots, &days[day].1, value);
                        imputed_days.push((days[day].0, value));
                    }
                    None => unrepaired_days.push(days[day].0),
                }
            }
            filled
        }
        WholeDayDetection::AfterFill => {
            let filled = forward_fill(&mut slots, |_| true);

            for day in 0..days.len() {
                let current: Vec<Option<f64>> = slots.iter().map(|slot| slot.price).collect();
                if !is_empty(&current, &days[day].1) {
                    continue;
                }
                match neighbor_average(&current, &days, day, options.neighbor_days) {
                    Some(value) => {
                        assign_day(&mut slots, &days[day].1, value);
                        imputed_days.push((days[day].0, value));
                    }
                    None => unrepaired_days.push(days[day].0),
                }
            }
            filled
        }
    };

    for (day, value) in &imputed_days {
        debug!("Filled {} with neighbor average {:.4}", day, value);
    }
    for day in &unrepaired_days {
        warn!(
            "No prices within {} days of {}; leaving the day empty",
            options.neighbor_days, day
        );
    }
    info!(
        "Repaired hourly series: {} slots, {} missing before repair, {} forward-filled, {} days averaged, {} days unrepaired",
        slots.len(),
        missing_before_repair.len(),
        forward_filled,
        imputed_days.len(),
        unrepaired_days.len()
    );

    (
        RepairedSeries { slots },
        RepairReport {
            missing_before_repair,
            outside_grid,
            forward_filled,
            imputed_days,
            unrepaired_days,
        },
    )
}

fn is_empty(prices: &[Option<f64>], range: &Range<usize>) -> bool {
    prices[range.clone()].iter().all(Option::is_none)
}

/// Carry the last known price into missing slots, visiting only slots for
/// which `eligible` holds. Returns the number of slots filled.
fn forward_fill(slots: &mut [HourlySlot], eligible: impl Fn(usize) -> bool) -> usize {
    let mut last_known = None;
    let mut filled = 0;

    for (index, slot) in slots.iter_mut().enumerate() {
        if !eligible(index) {
            continue;
        }
        match slot.price {
            Some(price) => last_known = Some(price),
            None => {
                if let Some(price) = last_known {
                    slot.price = Some(price);
                    slot.source = SlotSource::ForwardFilled;
                    filled += 1;
                }
            }
        }
    }

    filled
}

/// Mean of the known prices in `[day - n, day)` and `(day, day + n]`
fn neighbor_average(
    prices: &[Option<f64>],
    days: &[DayRange],
    day: usize,
    neighbor_days: u32,
) -> Option<f64> {
    let date = days[day].0;
    let span = Days::new(u64::from(neighbor_days));
    let lower = date.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
    let upper = date.checked_add_days(span).unwrap_or(NaiveDate::MAX);

    mean(
        days.iter()
            .filter(|(other, _)| *other != date && *other >= lower && *other <= upper)
            .flat_map(|(_, range)| prices[range.clone()].iter().flatten().copied()),
    )
}

fn assign_day(slots: &mut [HourlySlot], range: &Range<usize>, value: f64) {
    for slot in &mut slots[range.clone()] {
        slot.price = Some(value);
        slot.source = SlotSource::DayAverage;
    }
}
