//! A single calendar day

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An immutable Gregorian calendar date.
///
/// Arithmetic is in whole days: `day + 3` and `day - 3` return new values and
/// `later - earlier` is the signed number of days between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    /// Build a day, rejecting dates that don't exist (e.g. 31 June)
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| Error::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day)))
    }

    /// Build a day from components already known to be valid, such as the
    /// first of a validated month or an entry of a literal table.
    pub(crate) fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self(
            NaiveDate::from_ymd_opt(year, month, day)
                .expect("calendar components validated by caller"),
        )
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Signed number of days from `earlier` to `self`
    pub fn days_since(&self, earlier: Day) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    /// The Monday of the week containing this day (the day itself if it is a Monday)
    pub fn monday_on_or_before(&self) -> Day {
        *self - i64::from(self.weekday().num_days_from_monday())
    }

    pub fn succ(&self) -> Day {
        *self + 1
    }

    pub fn pred(&self) -> Day {
        *self - 1
    }
}

impl Add<i64> for Day {
    type Output = Day;

    fn add(self, days: i64) -> Day {
        Day(self.0 + Duration::days(days))
    }
}

impl Sub<i64> for Day {
    type Output = Day;

    fn sub(self, days: i64) -> Day {
        Day(self.0 - Duration::days(days))
    }
}

impl Sub<Day> for Day {
    type Output = i64;

    fn sub(self, earlier: Day) -> i64 {
        self.days_since(earlier)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| Error::InvalidDate(format!("{} ({})", s, e)))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
