//! Regular calendar periods: months, quarters and years

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::{DateRange, Day, Period};
use crate::error::{Error, Result};

/// A calendar month, e.g. April 2023
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    pub fn containing(day: Day) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn quarter(&self) -> Quarter {
        Quarter {
            year: self.year,
            quarter: (self.month - 1) / 3 + 1,
        }
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl DateRange for Month {
    fn first_day(&self) -> Day {
        Day::ymd(self.year, self.month, 1)
    }

    fn last_day(&self) -> Day {
        (*self + 1).first_day().pred()
    }
}

impl Period for Month {
    fn containing(day: Day) -> Result<Self> {
        Ok(Month::containing(day))
    }

    fn succ(&self) -> Self {
        *self + 1
    }
}

impl Add<i32> for Month {
    type Output = Month;

    fn add(self, months: i32) -> Month {
        Month::from_index(self.index() + i64::from(months))
    }
}

impl Sub<i32> for Month {
    type Output = Month;

    fn sub(self, months: i32) -> Month {
        Month::from_index(self.index() - i64::from(months))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A calendar quarter (Q1 = January to March)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    year: i32,
    quarter: u32,
}

impl Quarter {
    pub fn new(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(Error::InvalidQuarter { quarter });
        }
        Ok(Self { year, quarter })
    }

    pub fn containing(day: Day) -> Self {
        Month::containing(day).quarter()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    pub fn first_month(&self) -> Month {
        Month {
            year: self.year,
            month: (self.quarter - 1) * 3 + 1,
        }
    }

    pub fn months(&self) -> [Month; 3] {
        let first = self.first_month();
        [first, first + 1, first + 2]
    }
}

impl DateRange for Quarter {
    fn first_day(&self) -> Day {
        self.first_month().first_day()
    }

    fn last_day(&self) -> Day {
        (self.first_month() + 2).last_day()
    }
}

impl Period for Quarter {
    fn containing(day: Day) -> Result<Self> {
        Ok(Quarter::containing(day))
    }

    fn succ(&self) -> Self {
        *self + 1
    }
}

impl Add<i32> for Quarter {
    type Output = Quarter;

    fn add(self, quarters: i32) -> Quarter {
        (self.first_month() + quarters * 3).quarter()
    }
}

impl Sub<i32> for Quarter {
    type Output = Quarter;

    fn sub(self, quarters: i32) -> Quarter {
        (self.first_month() - quarters * 3).quarter()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

/// A calendar year, January to December
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(pub i32);

impl Year {
    pub fn containing(day: Day) -> Self {
        Year(day.year())
    }

    pub fn months(&self) -> Vec<Month> {
        (1..=12)
            .map(|month| Month {
                year: self.0,
                month,
            })
            .collect()
    }
}

impl DateRange for Year {
    fn first_day(&self) -> Day {
        Day::ymd(self.0, 1, 1)
    }

    fn last_day(&self) -> Day {
        Day::ymd(self.0, 12, 31)
    }
}

impl Period for Year {
    fn containing(day: Day) -> Result<Self> {
        Ok(Year::containing(day))
    }

    fn succ(&self) -> Self {
        Year(self.0 + 1)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{periods_within, SimpleDateRange};

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = Month::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), day("2024-02-01"));
        assert_eq!(feb.last_day(), day("2024-02-29"));
        assert_eq!(Month::new(2023, 12).unwrap().last_day(), day("2023-12-31"));
        assert!(Month::new(2023, 13).is_err());
        assert!(Month::new(2023, 0).is_err());
    }

    #[test]
    fn test_month_arithmetic_carries_years() {
        let nov = Month::new(2022, 11).unwrap();
        assert_eq!(nov + 2, Month::new(2023, 1).unwrap());
        assert_eq!(nov + 14, Month::new(2024, 1).unwrap());
        assert_eq!(nov - 11, Month::new(2021, 12).unwrap());
        assert_eq!((nov + 25) - 25, nov);
    }

    #[test]
    fn test_month_adjacency() {
        let mut month = Month::new(2019, 1).unwrap();
        for _ in 0..60 {
            assert_eq!(month.last_day().succ(), (month + 1).first_day());
            month = month + 1;
        }
    }

    #[test]
    fn test_quarter() {
        let q = Quarter::containing(day("2023-05-17"));
        assert_eq!(q, Quarter::new(2023, 2).unwrap());
        assert_eq!(q.first_day(), day("2023-04-01"));
        assert_eq!(q.last_day(), day("2023-06-30"));
        assert_eq!(q + 3, Quarter::new(2024, 1).unwrap());
        assert_eq!(q - 2, Quarter::new(2022, 4).unwrap());
        assert!(Quarter::new(2023, 5).is_err());
    }

    #[test]
    fn test_year() {
        let y = Year::containing(day("2023-05-17"));
        assert_eq!(y.first_day(), day("2023-01-01"));
        assert_eq!(y.last_day(), day("2023-12-31"));
        assert_eq!(y.months().len(), 12);
        assert_eq!(y.num_days(), 365);
    }

    #[test]
    fn test_split_range_into_months() {
        let range = SimpleDateRange::new(day("2023-01-15"), day("2023-04-01")).unwrap();
        let months: Vec<Month> = periods_within(&range).unwrap();
        assert_eq!(months.len(), 4);
        assert_eq!(months[0], Month::new(2023, 1).unwrap());
        assert_eq!(months[3], Month::new(2023, 4).unwrap());
    }
}
