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

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::types::DateWindow;

pub const HOURS_PER_DAY: usize = 24;

/// Complete hourly timeline for a window: one slot per hour from the first
/// midnight (inclusive) to the midnight after the last day (exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyGrid {
    start: NaiveDateTime,
    slots: Vec<NaiveDateTime>,
}

impl HourlyGrid {
    #[must_use]
    pub fn new(window: &DateWindow) -> Self {
        let start = window.start.and_time(NaiveTime::MIN);
        let end = window.end_exclusive().and_time(NaiveTime::MIN);

        let mut slots = Vec::with_capacity(window.day_count() * HOURS_PER_DAY);
        let mut current = start;
        while current < end {
            slots.push(current);
            current += TimeDelta::hours(1);
        }

        Self { start, slots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[NaiveDateTime] {
        &self.slots
    }

    /// Position of a timestamp in the grid, `None` when it falls outside the
    /// window or is not on a whole hour.
    #[must_use]
    pub fn index_of(&self, timestamp: NaiveDateTime) -> Option<usize> {
        if timestamp < self.start || timestamp.minute() != 0 || timestamp.second() != 0 {
            return None;
        }
        let offset = timestamp - self.start;
        let index = usize::try_from(offset.num_hours()).ok()?;
        (index < self.slots.len()).then_some(index)
    }

    /// Calendar days in grid order, each with the range of slot indices it covers
    #[must_use]
    pub fn day_ranges(&self) -> Vec<(NaiveDate, std::ops::Range<usize>)> {
        let mut ranges: Vec<(NaiveDate, std::ops::Range<usize>)> = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some((day, range)) = ranges.last_mut()
                && *day == slot.date()
            {
                range.end = index + 1;
                continue;
            }
            ranges.push((slot.date(), index..index + 1));
        }
        ranges
    }
}
