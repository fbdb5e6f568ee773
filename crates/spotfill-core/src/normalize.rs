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

//! Flattening of the nested API payload into sorted hourly observations

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SpotfillError};
use crate::types::{PriceObservation, RawPrices};

const END_OF_DAY_LABEL: &str = "24:00";

/// Where the `24:00` hour label of a date is placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MidnightPolicy {
    /// `24:00` of D becomes `00:00` of D+1
    #[default]
    NextDay,
    /// `24:00` of D becomes `00:00` of D
    SameDay,
}

/// Observations sorted by timestamp plus counters for what was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPrices {
    pub observations: Vec<PriceObservation>,
    /// Entries with a `null` price
    pub null_prices: usize,
    /// Remapped `24:00` entries that landed on an explicit `00:00`
    pub collisions: usize,
}

struct Entry {
    price: f64,
    remapped: bool,
}

/// Flatten `date → hour → price` into chronologically sorted observations.
///
/// An explicit `00:00` label always wins over a `24:00` label remapped onto
/// the same timestamp.
pub fn normalize(raw: &RawPrices, policy: MidnightPolicy) -> Result<NormalizedPrices> {
    let mut entries: BTreeMap<NaiveDateTime, Entry> = BTreeMap::new();
    let mut null_prices = 0;
    let mut collisions = 0;

    for (date_key, hours) in raw {
        let date = NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
            .map_err(|_| SpotfillError::InvalidDate(date_key.clone()))?;

        for (label, price) in hours {
            let (timestamp, remapped) = resolve_timestamp(date, label, policy).ok_or_else(|| {
                SpotfillError::InvalidHour {
                    date: date_key.clone(),
                    label: label.clone(),
                }
            })?;

            let Some(price) = *price else {
                null_prices += 1;
                continue;
            };

            match entries.get(&timestamp) {
                None => {
                    entries.insert(timestamp, Entry { price, remapped });
                }
                Some(existing) => {
                    collisions += 1;
                    if existing.remapped && !remapped {
                        entries.insert(timestamp, Entry { price, remapped });
                    }
                }
            }
        }
    }

    if collisions > 0 {
        warn!(
            "{} remapped 24:00 prices collided with an explicit 00:00 label; kept the explicit ones",
            collisions
        );
    }
    debug!(
        "Normalized {} observations ({} null prices skipped)",
        entries.len(),
        null_prices
    );

    Ok(NormalizedPrices {
        observations: entries
            .into_iter()
            .map(|(timestamp, entry)| PriceObservation {
                timestamp,
                price: entry.price,
            })
            .collect(),
        null_prices,
        collisions,
    })
}

/// Parse an `HH:MM` label for `date`. Returns the timestamp and whether it
/// came from the `24:00` label.
fn resolve_timestamp(
    date: NaiveDate,
    label: &str,
    policy: MidnightPolicy,
) -> Option<(NaiveDateTime, bool)> {
    if label == END_OF_DAY_LABEL {
        let day = match policy {
            MidnightPolicy::NextDay => date.checked_add_days(Days::new(1))?,
            MidnightPolicy::SameDay => date,
        };
        return Some((day.and_hms_opt(0, 0, 0)?, true));
    }

    let (hour, minute) = label.split_once(':')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hour) || !two_digits(minute) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    Some((date.and_hms_opt(hour, minute, 0)?, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str, Option<f64>)]) -> RawPrices {
        let mut raw = RawPrices::new();
        for (date, label, price) in entries {
            raw.entry((*date).to_owned())
                .or_default()
                .insert((*label).to_owned(), *price);
        }
        raw
    }

    fn ts(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_sorted_chronologically() {
        let input = raw(&[
            ("2024-03-16", "01:00", Some(3.0)),
            ("2024-03-16", "00:00", Some(2.0)),
            ("2024-03-15", "23:00", Some(1.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::NextDay).unwrap();
        let timestamps: Vec<_> = normalized
            .observations
            .iter()
            .map(|o| o.timestamp)
            .collect();

        assert_eq!(
            timestamps,
            vec![
                ts("2024-03-15", "23:00"),
                ts("2024-03-16", "00:00"),
                ts("2024-03-16", "01:00"),
            ]
        );
    }

    #[test]
    fn test_end_of_day_moves_to_next_day() {
        let input = raw(&[
            ("2024-03-15", "23:00", Some(1.0)),
            ("2024-03-15", "24:00", Some(5.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::NextDay).unwrap();
        let last = normalized.observations.last().unwrap();
        assert_eq!(last.timestamp, ts("2024-03-16", "00:00"));
        assert!((last.price - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_of_day_same_day_policy() {
        let input = raw(&[
            ("2024-03-15", "01:00", Some(1.0)),
            ("2024-03-15", "24:00", Some(5.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::SameDay).unwrap();
        let first = normalized.observations.first().unwrap();
        assert_eq!(first.timestamp, ts("2024-03-15", "00:00"));
        assert!((first.price - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_midnight_wins_collision() {
        // 24:00 of the 15th lands on 00:00 of the 16th
        let input = raw(&[
            ("2024-03-15", "24:00", Some(9.0)),
            ("2024-03-16", "00:00", Some(4.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::NextDay).unwrap();
        assert_eq!(normalized.observations.len(), 1);
        assert_eq!(normalized.collisions, 1);
        assert!((normalized.observations[0].price - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_day_collision_keeps_explicit_label() {
        let input = raw(&[
            ("2024-03-15", "00:00", Some(4.0)),
            ("2024-03-15", "24:00", Some(9.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::SameDay).unwrap();
        assert_eq!(normalized.observations.len(), 1);
        assert_eq!(normalized.collisions, 1);
        assert!((normalized.observations[0].price - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_prices_are_skipped() {
        let input = raw(&[
            ("2024-03-15", "00:00", None),
            ("2024-03-15", "01:00", Some(2.0)),
        ]);

        let normalized = normalize(&input, MidnightPolicy::NextDay).unwrap();
        assert_eq!(normalized.observations.len(), 1);
        assert_eq!(normalized.null_prices, 1);
    }

    #[test]
    fn test_invalid_date_key() {
        let input = raw(&[("15-03-2024", "00:00", Some(1.0))]);
        let err = normalize(&input, MidnightPolicy::NextDay).unwrap_err();
        assert!(matches!(err, SpotfillError::InvalidDate(key) if key == "15-03-2024"));
    }

    #[test]
    fn test_invalid_hour_labels() {
        for label in ["25:00", "7:00", "ab:cd", "12", "12:60", "+1:00", "01:+5"] {
            let input = raw(&[("2024-03-15", label, Some(1.0))]);
            let err = normalize(&input, MidnightPolicy::NextDay).unwrap_err();
            assert!(
                matches!(err, SpotfillError::InvalidHour { .. }),
                "label {label} should be rejected"
            );
        }
    }
}
