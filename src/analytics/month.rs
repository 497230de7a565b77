//! Month Window Resolver
//!
//! Turns a month name into the half-open instant interval
//! `[first instant of month, first instant of next month)` in UTC for a
//! fixed reference year. Aggregations never span more than that one year.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::Serialize;

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::storage::DateRange;

/// Reference year the dashboard aggregates over unless configured otherwise
pub const DEFAULT_REFERENCE_YEAR: i32 = 2023;

/// Recognized month names, January first. Matching is case-sensitive.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month number (1-12) for a month name
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|&m| m == name)
        .map(|idx| idx as u32 + 1)
}

/// Advance an instant by whole calendar months, rolling the year as needed
pub fn add_months(instant: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    instant.checked_add_months(Months::new(months))
}

/// One calendar month as a half-open UTC interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    /// First instant of the month (inclusive)
    pub start: DateTime<Utc>,
    /// First instant of the following month (exclusive)
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Resolve a month name within the given year
    pub fn resolve(name: &str, year: i32) -> AnalyticsResult<Self> {
        let month = month_number(name)
            .ok_or_else(|| AnalyticsError::InvalidMonth(name.to_string()))?;
        Self::from_ordinal(year, month)
            .ok_or_else(|| AnalyticsError::InvalidMonth(format!("{} {}", name, year)))
    }

    /// Window for a numeric month (1-12); None if the date is unrepresentable
    pub fn from_ordinal(year: i32, month: u32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
        let end = add_months(start, 1)?;
        Some(Self { start, end })
    }

    /// English month name of this window
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.start.month0() as usize]
    }

    /// Year of this window's start
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// As a storage date range
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Check if an instant falls within this month
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.range().contains(instant)
    }
}

impl std::fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.year())
    }
}
