//! Period selection and date bucketing helpers.
//!
//! Timestamps arrive as ISO-8601 strings (`2024-01-05`, `2024-01-05T09:15:00+05:30`,
//! ...). Only the leading `YYYY-MM-DD` is significant.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "w" => Ok(Period::Week),
            "month" | "monthly" | "m" => Ok(Period::Month),
            other => Err(format!("expected week or month, found '{}'", other)),
        }
    }
}

/// Calendar date of an ISO timestamp, from its first ten characters.
pub fn parse_ymd(ts: &str) -> Option<NaiveDate> {
    let ts = ts.trim();
    let ymd = ts.get(..10)?;
    NaiveDate::parse_from_str(ymd, "%Y-%m-%d").ok()
}

pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

pub fn bucket_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Month => month_key(date),
        Period::Week => format_ymd(week_start(date)),
    }
}

/// Whole days from `start` to `end`. None if either fails to parse or
/// `end` falls before `start`.
pub fn days_between_iso_dates(start: &str, end: &str) -> Option<i64> {
    let a = parse_ymd(start)?;
    let b = parse_ymd(end)?;
    let days = (b - a).num_days();
    (days >= 0).then_some(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_ymd_accepts_timestamps() {
        assert_eq!(parse_ymd("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_ymd("2024-01-05T09:15:00+05:30"), Some(d(2024, 1, 5)));
        assert_eq!(parse_ymd(" 2024-01-05 10:00:00 "), Some(d(2024, 1, 5)));
    }

    #[test]
    fn parse_ymd_rejects_garbage() {
        assert_eq!(parse_ymd(""), None);
        assert_eq!(parse_ymd("2024-1-5"), None);
        assert_eq!(parse_ymd("2024-02-30"), None);
        assert_eq!(parse_ymd("not a date"), None);
    }

    #[test]
    fn week_start_wednesday_goes_back_to_monday() {
        assert_eq!(week_start(d(2024, 1, 10)), d(2024, 1, 8));
    }

    #[test]
    fn week_start_sunday_goes_back_six_days() {
        assert_eq!(week_start(d(2024, 1, 14)), d(2024, 1, 8));
    }

    #[test]
    fn week_start_monday_is_itself() {
        assert_eq!(week_start(d(2024, 1, 8)), d(2024, 1, 8));
    }

    #[test]
    fn week_start_crosses_month_and_year() {
        assert_eq!(week_start(d(2024, 1, 3)), d(2024, 1, 1));
        assert_eq!(week_start(d(2023, 1, 1)), d(2022, 12, 26));
    }

    #[test]
    fn bucket_keys() {
        assert_eq!(bucket_key(d(2024, 2, 29), Period::Month), "2024-02");
        assert_eq!(bucket_key(d(2024, 2, 29), Period::Week), "2024-02-26");
    }

    #[test]
    fn days_between() {
        assert_eq!(days_between_iso_dates("2024-01-01", "2024-01-31"), Some(30));
        assert_eq!(
            days_between_iso_dates("2024-01-01T15:30:00", "2024-01-02T09:00:00"),
            Some(1)
        );
        assert_eq!(days_between_iso_dates("2024-01-05", "2024-01-05"), Some(0));
    }

    #[test]
    fn days_between_negative_or_invalid_is_none() {
        assert_eq!(days_between_iso_dates("2024-02-01", "2024-01-01"), None);
        assert_eq!(days_between_iso_dates("bad", "2024-01-01"), None);
        assert_eq!(days_between_iso_dates("2024-01-01", ""), None);
    }

    #[test]
    fn period_parses() {
        assert_eq!("WEEK".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert!("year".parse::<Period>().is_err());
        assert_eq!(Period::Week.to_string(), "week");
    }
}
