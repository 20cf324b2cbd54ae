use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A calendar month of a specific year, e.g. `2024-01`.
///
/// Membership is decided on the parsed calendar date, never on a textual
/// prefix of the date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Always the first day of the month.
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// The month a given date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date - chrono::Duration::days(i64::from(date.day0())),
        }
    }

    /// The current month in the local timezone.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Human-readable label, e.g. "January 2024".
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    /// Accepts exactly `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseYearMonthError(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let is_digits = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|c| c.is_ascii_digit())
        };
        if !is_digits(year, 4) || !is_digits(month, 2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct ParseYearMonthError(String);

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let month: YearMonth = "2024-01".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 1);
        assert_eq!(month.to_string(), "2024-01");
        assert_eq!(month.label(), "January 2024");
    }

    #[test]
    fn test_parse_rejects_loose_tokens() {
        for token in ["2024-1", "24-01", "2024-13", "2024-00", "2024/01", "2024", "", "2024-01-05"] {
            assert!(token.parse::<YearMonth>().is_err(), "accepted {token:?}");
        }
    }

    #[test]
    fn test_of_date() {
        let month = YearMonth::of(date("2024-02-29"));
        assert_eq!(month, YearMonth::new(2024, 2).unwrap());
        assert_eq!(month.first_day(), date("2024-02-01"));
    }

    #[test]
    fn test_contains_is_calendar_exact() {
        let january = YearMonth::new(2024, 1).unwrap();
        assert!(january.contains(date("2024-01-01")));
        assert!(january.contains(date("2024-01-31")));
        assert!(!january.contains(date("2024-10-01")));
        assert!(!january.contains(date("2023-12-31")));
        assert!(!january.contains(date("2025-01-15")));
    }

    #[test]
    fn test_ordering() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = YearMonth::new(2024, 1).unwrap();
        assert!(dec < jan);
    }
}
