//! Inclusive date ranges
//!
//! Used by transaction queries, reports and budget status. Parses either a
//! calendar month ("2025-01") or an explicit range ("2025-01-01..2025-01-15").

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date range, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole of a calendar month
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateRangeError::InvalidMonth(month))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(DateRangeError::InvalidMonth(month))?;

        Ok(Self {
            start,
            end: next - Duration::days(1),
        })
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Result<Self, DateRangeError> {
        Self::month(date.year(), date.month())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Parse a range string
    ///
    /// Formats:
    /// - Monthly: "2025-01"
    /// - Explicit: "2025-01-01..2025-01-15"
    pub fn parse(s: &str) -> Result<Self, DateRangeError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start.trim()).ok_or_else(|| invalid(s))?;
            let end = parse_date(end.trim()).ok_or_else(|| invalid(s))?;
            return Self::new(start, end);
        }

        let (year, month) = s.split_once('-').ok_or_else(|| invalid(s))?;
        let year: i32 = year.parse().map_err(|_| invalid(s))?;
        let month: u32 = month.parse().map_err(|_| invalid(s))?;
        if !(1..=12).contains(&month) {
            return Err(DateRangeError::InvalidMonth(month));
        }
        Self::month(year, month)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn invalid(s: &str) -> DateRangeError {
    DateRangeError::InvalidFormat(s.to_string())
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Error type for date range construction and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    InvalidFormat(String),
    InvalidMonth(u32),
    Reversed { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid date range: {}", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {} (must be 1-12)", m),
            Self::Reversed { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.start(), date(2024, 2, 1));
        assert_eq!(feb.end(), date(2024, 2, 29));

        let dec = DateRange::month(2025, 12).unwrap();
        assert_eq!(dec.end(), date(2025, 12, 31));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2025, 1, 10), date(2025, 1, 20)).unwrap();
        assert!(range.contains(date(2025, 1, 10)));
        assert!(range.contains(date(2025, 1, 20)));
        assert!(!range.contains(date(2025, 1, 9)));
        assert!(!range.contains(date(2025, 1, 21)));
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            DateRange::new(date(2025, 2, 1), date(2025, 1, 1)),
            Err(DateRangeError::Reversed { .. })
        ));
        // A single day is fine
        assert!(DateRange::new(date(2025, 1, 1), date(2025, 1, 1)).is_ok());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            DateRange::parse("2025-03").unwrap(),
            DateRange::month(2025, 3).unwrap()
        );
        assert_eq!(
            DateRange::parse("2025-01-01..2025-01-15").unwrap(),
            DateRange::new(date(2025, 1, 1), date(2025, 1, 15)).unwrap()
        );
        assert!(matches!(
            DateRange::parse("2025-13"),
            Err(DateRangeError::InvalidMonth(13))
        ));
        assert!(DateRange::parse("garbage").is_err());
        assert!(DateRange::parse("2025-01-15..2025-01-01").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 15)).unwrap();
        assert_eq!(range.to_string(), "2025-01-01..2025-01-15");
        assert_eq!(DateRange::parse(&range.to_string()).unwrap(), range);
    }
}
