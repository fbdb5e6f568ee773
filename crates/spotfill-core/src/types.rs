// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Spotfill.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::error::{Result, SpotfillError};

/// Raw API payload: ISO date → hour label (`"00:00"`..`"24:00"`) → price.
/// A `null` price is kept as `None` and treated as missing.
pub type RawPrices = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// Inclusive calendar day range requested from the price API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    /// Last requested day (inclusive)
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(SpotfillError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day after the window; the hourly grid stops right before its midnight
    #[must_use]
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
    }

    /// Number of calendar days covered
    #[must_use]
    pub fn day_count(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    /// Iterate over every day of the window
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|day| *day <= self.end)
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// A single observed hourly price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

/// How the value of an hourly slot was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    /// Price came straight from the API
    Observed,
    /// Carried forward from the nearest earlier known price
    ForwardFilled,
    /// Mean of the neighbor days of a day with no observations
    DayAverage,
    /// Still unknown after repair
    Missing,
}

/// One slot of the repaired hourly series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySlot {
    pub timestamp: NaiveDateTime,
    pub price: Option<f64>,
    pub source: SlotSource,
}

impl HourlySlot {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The hourly grid with every slot populated as far as repair allows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairedSeries {
    pub slots: Vec<HourlySlot>,
}

impl RepairedSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when no slot is left without a price
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.price.is_some())
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.price.is_none()).count()
    }

    /// Price at an exact timestamp, if the slot exists and is known
    #[must_use]
    pub fn price_at(&self, timestamp: NaiveDateTime) -> Option<f64> {
        self.slots
            .iter()
            .find(|slot| slot.timestamp == timestamp)
            .and_then(|slot| slot.price)
    }

    /// Slots belonging to one calendar day
    pub fn day(&self, date: NaiveDate) -> impl Iterator<Item = &HourlySlot> {
        self.slots.iter().filter(move |slot| slot.date() == date)
    }
}

/// Daily mean with its trailing 7-day rolling mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// `None` when the day has no known hourly price
    pub daily_average: Option<f64>,
    /// `None` for the first 6 days and for windows containing a day without an average
    pub rolling_average: Option<f64>,
}

/// Diagnostics collected while repairing the hourly series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairReport {
    /// Grid slots with no observation, before any filling
    pub missing_before_repair: Vec<NaiveDateTime>,
    /// Observations whose timestamp is not on the grid
    pub outside_grid: usize,
    /// Slots filled by carrying a price forward
    pub forward_filled: usize,
    /// Days filled with their neighbor mean, with the value assigned
    pub imputed_days: Vec<(NaiveDate, f64)>,
    /// Days with no observations and no usable neighbor prices
    pub unrepaired_days: Vec<NaiveDate>,
}
