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

use crate::types::{DailyAggregate, RepairedSeries};

/// Length of the trailing moving average, in days
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// Arithmetic mean, `None` for an empty input
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts stay far below the f64 mantissa"
)]
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Mean of the known hourly prices of each calendar day, in series order.
/// Unknown slots are skipped; a day without any known price has no average.
#[must_use]
pub fn daily_averages(series: &RepairedSeries) -> Vec<(NaiveDate, Option<f64>)> {
    let mut days: Vec<(NaiveDate, Vec<f64>)> = Vec::new();

    for slot in &series.slots {
        if days.last().is_none_or(|(day, _)| *day != slot.date()) {
            days.push((slot.date(), Vec::new()));
        }
        if let (Some(price), Some((_, prices))) = (slot.price, days.last_mut()) {
            prices.push(price);
        }
    }

    days.into_iter()
        .map(|(day, prices)| (day, mean(prices)))
        .collect()
}

/// Trailing simple moving average over `window` entries.
///
/// The first `window - 1` entries have no value, and neither does any window
/// that contains a missing entry.
#[must_use]
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|index| {
            if index + 1 < window {
                return None;
            }
            values[index + 1 - window..=index]
                .iter()
                .copied()
                .collect::<Option<Vec<f64>>>()
                .and_then(mean)
        })
        .collect()
}

/// Daily averages with their 7-day rolling mean
#[must_use]
pub fn aggregate(series: &RepairedSeries) -> Vec<DailyAggregate> {
    let daily = daily_averages(series);
    let averages: Vec<Option<f64>> = daily.iter().map(|(_, average)| *average).collect();
    let rolling = rolling_mean(&averages, ROLLING_WINDOW_DAYS);

    daily
        .into_iter()
        .zip(rolling)
        .map(|((date, daily_average), rolling_average)| DailyAggregate {
            date,
            daily_average,
            rolling_average,
        })
        .collect()
}
