//! Calendar month key (`YYYY-MM`)
//!
//! Budgets, tax obligations and dashboard summaries are all keyed by month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Years a month key may name; `YYYY` in the file formats
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month; `month` must be 1-12 and `year` within
    /// [`MIN_YEAR`]..=[`MAX_YEAR`]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .unwrap_or(NaiveDate::MAX)
    }

    /// The given day of this month, clamped to the month's last day
    pub fn day(&self, day: u32) -> NaiveDate {
        let last = self.last_day();
        NaiveDate::from_ymd_opt(self.year, self.month, day.clamp(1, last.day())).unwrap_or(last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| PeriodParseError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| PeriodParseError(s.to_string()))?;
        Self::new(year, month).ok_or_else(|| PeriodParseError(s.to_string()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:04}-{:02}", self.year, self.month))
    }
}

impl FromStr for YearMonth {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid month '{}', expected YYYY-MM", self.0)
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let m = YearMonth::parse("2025-01").unwrap();
        assert_eq!(m.to_string(), "2025-01");
        assert!(YearMonth::parse("2025-13").is_err());
        assert!(YearMonth::parse("2025/01").is_err());
    }

    #[test]
    fn test_bounds() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(feb.day(31), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn test_year_range() {
        assert!(YearMonth::parse("300000-01").is_err());
        assert!(YearMonth::parse("0-05").is_err());
        assert!(YearMonth::new(MAX_YEAR + 1, 1).is_none());

        let last = YearMonth::new(MAX_YEAR, 12).unwrap();
        assert_eq!(last.last_day(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
        assert_eq!(last.next().first_day(), NaiveDate::from_ymd_opt(10000, 1, 1).unwrap());

        // Months built from dates at chrono's own limit still have bounds
        let edge = YearMonth::of(NaiveDate::MAX);
        assert_eq!(edge.last_day(), NaiveDate::MAX);
        assert!(edge.next().last_day() >= edge.last_day());
    }

    #[test]
    fn test_navigation_wraps_year() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_serializes_as_string() {
        let m = YearMonth::new(2025, 7).unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"2025-07\"");
        let back: YearMonth = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(back, m);
    }
}
