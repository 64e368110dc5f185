//! Schedules fan one creation request out to several event rows.
//!
//! A [`Schedule`] is only alive while the creation wizard is open. It is
//! consumed once at submission.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;
use crate::storage::DateRange;

/// One occurrence of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ScheduleEntry {
    /// Creates an entry, rejecting an end time that is not after the start time.
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, ScheduleError> {
        if end_time <= start_time {
            return Err(ScheduleError::InvalidTimeRange);
        }
        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }
}

/// Expands a date range into one entry per day, ascending by date.
///
/// Both ends are inclusive.
pub fn expand_date_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Vec<ScheduleEntry>, ScheduleError> {
    let range =
        DateRange::new(start_date, end_date).map_err(|_| ScheduleError::InvalidDateRange)?;
    range
        .days()
        .map(|date| ScheduleEntry::new(date, start_time, end_time))
        .collect()
}

/// The schedule accumulated by the creation wizard.
///
/// Entries are kept sorted by date, then start time. A rejected addition
/// leaves the schedule untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single occurrence.
    pub fn add(
        &mut self,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<(), ScheduleError> {
        let entry = ScheduleEntry::new(date, start_time, end_time)?;
        if self.entries.contains(&entry) {
            return Err(ScheduleError::Duplicate(date));
        }
        self.entries.push(entry);
        self.entries.sort();
        Ok(())
    }

    /// Adds one occurrence per day of a date range.
    ///
    /// Days already scheduled with the same times are skipped.
    pub fn add_range(
        &mut self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<usize, ScheduleError> {
        let expanded = expand_date_range(start_date, end_date, start_time, end_time)?;
        let before = self.entries.len();
        for entry in expanded {
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
        self.entries.sort();
        Ok(self.entries.len() - before)
    }

    /// Removes the entry at the given position.
    pub fn remove(&mut self, index: usize) -> Result<ScheduleEntry, ScheduleError> {
        if index >= self.entries.len() {
            return Err(ScheduleError::OutOfBounds(index));
        }
        Ok(self.entries.remove(index))
    }

    /// Returns the entries, sorted.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the schedule.
    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }
}
