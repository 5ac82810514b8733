use crate::error::{AnalyticsError, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Orders chronologically (year, then month), never by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        first_day_of_month(self.year, self.month)
    }

    pub fn last_day(&self) -> NaiveDate {
        last_day_of_month(self.year, self.month)
    }

    /// Short display label, e.g. "Jan 2025".
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| {
                AnalyticsError::DateError(format!("Invalid month: {}. Expected YYYY-MM", s))
            })?;
        Ok(Self::from_date(start))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX)
}

pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let year_diff = end.year() - start.year();
    let month_diff = end.month() as i32 - start.month() as i32;
    year_diff * 12 + month_diff
}

/// Parses an ISO calendar date. Accepts `YYYY-MM-DD` and ISO date-times
/// (`2025-01-05T10:00:00Z`, `2025-01-05T10:00:00`, `2025-01-05 10:00:00`),
/// keeping only the calendar date. Returns `None` for anything else.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Parses a period string in the format "YYYY-MM" or "YYYY-MM:YYYY-MM"
/// Returns (first day of start month, last day of end month)
pub fn parse_period_string(period: &str) -> Result<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = period.split(':').collect();

    let (start, end) = match parts.as_slice() {
        [single] => {
            let month: MonthKey = single.parse()?;
            (month, month)
        }
        [from, to] => (from.parse::<MonthKey>()?, to.parse::<MonthKey>()?),
        _ => {
            return Err(AnalyticsError::DateError(format!(
                "Invalid period format: {}. Expected 'YYYY-MM' or 'YYYY-MM:YYYY-MM'",
                period
            )))
        }
    };

    if end < start {
        return Err(AnalyticsError::DateError(format!(
            "Period '{}' ends ({}) before it starts ({})",
            period, end, start
        )));
    }

    Ok((start.first_day(), end.last_day()))
}
