//! The date-range capability shared by every period type

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Day;
use crate::error::{Error, Result};

/// Anything spanning a contiguous, inclusive run of days.
///
/// Implementations guarantee `first_day() <= last_day()`.
pub trait DateRange {
    fn first_day(&self) -> Day;

    fn last_day(&self) -> Day;

    fn contains_day(&self, day: Day) -> bool {
        self.first_day() <= day && day <= self.last_day()
    }

    fn contains_range(&self, other: &dyn DateRange) -> bool {
        self.first_day() <= other.first_day() && other.last_day() <= self.last_day()
    }

    fn overlaps(&self, other: &dyn DateRange) -> bool {
        self.first_day() <= other.last_day() && other.first_day() <= self.last_day()
    }

    fn num_days(&self) -> i64 {
        self.last_day() - self.first_day() + 1
    }

    fn days(&self) -> Days {
        Days {
            next: self.first_day(),
            last: self.last_day(),
        }
    }
}

/// Iterator over every day of a range, in order
#[derive(Debug, Clone)]
pub struct Days {
    next: Day,
    last: Day,
}

impl Iterator for Days {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if self.next > self.last {
            return None;
        }
        let day = self.next;
        self.next = day.succ();
        Some(day)
    }
}

/// A day is the degenerate one-day range
impl DateRange for Day {
    fn first_day(&self) -> Day {
        *self
    }

    fn last_day(&self) -> Day {
        *self
    }
}

/// A range with explicit bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleDateRange {
    first: Day,
    last: Day,
}

impl SimpleDateRange {
    pub fn new(first: Day, last: Day) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidRange {
                first: first.to_string(),
                last: last.to_string(),
            });
        }
        Ok(Self { first, last })
    }

    /// The range spanning exactly the same days as `range`
    pub fn covering(range: &dyn DateRange) -> Self {
        Self {
            first: range.first_day(),
            last: range.last_day(),
        }
    }
}

impl DateRange for SimpleDateRange {
    fn first_day(&self) -> Day {
        self.first
    }

    fn last_day(&self) -> Day {
        self.last
    }
}

impl fmt::Display for SimpleDateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.first, self.last)
    }
}

/// A range type that tiles the timeline: every day belongs to exactly one
/// period and each period is immediately followed by its successor.
pub trait Period: DateRange + Sized {
    fn containing(day: Day) -> Result<Self>;

    fn succ(&self) -> Self;
}

impl Period for Day {
    fn containing(day: Day) -> Result<Self> {
        Ok(day)
    }

    fn succ(&self) -> Self {
        Day::succ(self)
    }
}

/// Split a range into the periods that overlap it, in order.
///
/// The first and last periods may extend beyond the range.
pub fn periods_within<P: Period>(range: &dyn DateRange) -> Result<Vec<P>> {
    let mut periods = Vec::new();
    let mut period = P::containing(range.first_day())?;
    while period.first_day() <= range.last_day() {
        let next = period.succ();
        periods.push(period);
        period = next;
    }
    Ok(periods)
}
