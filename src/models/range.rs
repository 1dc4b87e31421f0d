//! Calendar-day stay ranges.
//!
//! All booking and estimate math runs on half-open `[from, to)` ranges at
//! calendar-day precision. Inputs carrying a time-of-day component are
//! truncated to the day before they reach this type, which keeps
//! timezone-boundary requests from producing false conflicts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error returned when a range's bounds are not strictly ordered.
#[derive(Debug, thiserror::Error)]
#[error("invalid stay range: check-in {from} must precede check-out {to}")]
pub struct InvalidStayRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A half-open `[from, to)` date range: the checkout day is not occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl StayRange {
    /// Build a range, rejecting `from >= to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, InvalidStayRange> {
        if from >= to {
            return Err(InvalidStayRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Number of nights covered, never less than one.
    pub fn nights(&self) -> i64 {
        (self.to - self.from).num_days().max(1)
    }

    /// Half-open overlap test: the shared boundary day is free, so a
    /// checkout on the same day as another booking's check-in never
    /// conflicts.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.from < other.to && self.to > other.from
    }

    /// Iterate every occupied day, check-in inclusive, checkout exclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d < self.to)
    }
}
