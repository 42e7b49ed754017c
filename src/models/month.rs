//! Calendar month keys used by payroll and commission records.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// A calendar month, written as `YYYY-MM`.
///
/// Salary slips and commission records are keyed by month. The key
/// serializes as its string form so collections stay readable on disk.
///
/// # Example
///
/// ```
/// use staff_ops_engine::models::MonthKey;
/// use chrono::NaiveDate;
///
/// let month: MonthKey = "2026-03".parse().unwrap();
/// assert_eq!(month.to_string(), "2026-03");
/// assert!(month.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
/// assert!(!month.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, returning `None` if `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns true if `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation {
            field: "month".to_string(),
            message: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_month() {
        let month: MonthKey = "2026-03".parse().unwrap();
        assert_eq!(month.year(), 2026);
        assert_eq!(month.month(), 3);
    }

    #[test]
    fn test_parse_rejects_month_13() {
        let result = "2026-13".parse::<MonthKey>();
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("March".parse::<MonthKey>().is_err());
        assert!("2026-3".parse::<MonthKey>().is_err());
        assert!("26-03".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_parse_rejects_signed_parts() {
        assert!("+026-03".parse::<MonthKey>().is_err());
        assert!("2026-+3".parse::<MonthKey>().is_err());
        assert!(" 2026-03".parse::<MonthKey>().is_ok());
    }

    #[test]
    fn test_display_pads_month() {
        let month = MonthKey::new(2026, 2).unwrap();
        assert_eq!(month.to_string(), "2026-02");
    }

    #[test]
    fn test_of_date() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(MonthKey::of(date), MonthKey::new(2026, 12).unwrap());
    }

    #[test]
    fn test_serializes_as_string() {
        let month = MonthKey::new(2026, 3).unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2026-03\"");

        let parsed: MonthKey = serde_json::from_str("\"2026-03\"").unwrap();
        assert_eq!(parsed, month);
    }

    #[test]
    fn test_deserialize_invalid_month_fails() {
        let result: Result<MonthKey, _> = serde_json::from_str("\"2026-00\"");
        assert!(result.is_err());
    }
}
