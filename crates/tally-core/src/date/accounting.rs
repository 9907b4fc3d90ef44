//! The club's fiscal calendar
//!
//! An accounting year `y` runs from a Monday near 1 September of calendar
//! year `y - 1` to the Sunday before the next year's first Monday, and is
//! divided into twelve accounting months, each a whole number of weeks.
//! Accounting month 1 corresponds to September, month 5 to January and month
//! 12 to August.
//!
//! For fiscal years 2013 to 2024 the month boundaries were chosen by hand
//! (mostly the Monday nearest the 1st, but not always) and are held here as
//! literal tables. The table dates are a reconstruction that satisfies the
//! calendar's rules (Monday boundaries, whole weeks, 52 or 53 week years); they
//! have not been checked against the filed accounts and should be corrected
//! from them where they differ. Every other year starts each month on the
//! Monday on or before the 1st of the corresponding calendar month.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::{DateRange, Day, Month, Period};
use crate::error::{Error, Result};

const FIRST_TABLE_YEAR: i32 = 2013;
const LAST_TABLE_YEAR: i32 = 2024;

/// First Monday of each accounting year.
///
/// Reconstructed, not copied from the filed accounts.
const FIRST_MONDAYS_OF_ACCOUNTING_YEAR: [(i32, (i32, u32, u32)); 12] = [
    (2013, (2012, 9, 3)),
    (2014, (2013, 9, 2)),
    (2015, (2014, 9, 1)),
    (2016, (2015, 8, 31)),
    (2017, (2016, 8, 29)),
    (2018, (2017, 9, 4)),
    (2019, (2018, 9, 3)),
    (2020, (2019, 9, 2)),
    (2021, (2020, 8, 31)),
    (2022, (2021, 8, 30)),
    (2023, (2022, 8, 29)),
    (2024, (2023, 8, 28)),
];

/// First day of accounting months 1 to 12 for each table year.
///
/// Reconstructed, not copied from the filed accounts; must agree with
/// `FIRST_MONDAYS_OF_ACCOUNTING_YEAR` for month 1.
#[rustfmt::skip]
const FIRST_DAY_OF_ACCOUNTING_MONTH: [(i32, [(i32, u32, u32); 12]); 12] = [
    (2013, [(2012, 9, 3), (2012, 10, 1), (2012, 10, 29), (2012, 12, 3), (2012, 12, 31), (2013, 2, 4),
            (2013, 3, 4), (2013, 4, 1), (2013, 4, 29), (2013, 6, 3), (2013, 7, 1), (2013, 7, 29)]),
    (2014, [(2013, 9, 2), (2013, 9, 30), (2013, 11, 4), (2013, 12, 2), (2013, 12, 30), (2014, 2, 3),
            (2014, 3, 3), (2014, 3, 31), (2014, 4, 28), (2014, 6, 2), (2014, 6, 30), (2014, 8, 4)]),
    (2015, [(2014, 9, 1), (2014, 9, 29), (2014, 11, 3), (2014, 12, 1), (2014, 12, 29), (2015, 2, 2),
            (2015, 3, 2), (2015, 3, 30), (2015, 5, 4), (2015, 6, 1), (2015, 6, 29), (2015, 8, 3)]),
    (2016, [(2015, 8, 31), (2015, 9, 28), (2015, 11, 2), (2015, 11, 30), (2016, 1, 4), (2016, 2, 1),
            (2016, 2, 29), (2016, 4, 4), (2016, 5, 2), (2016, 5, 30), (2016, 7, 4), (2016, 8, 1)]),
    (2017, [(2016, 8, 29), (2016, 10, 3), (2016, 10, 31), (2016, 11, 28), (2017, 1, 2), (2017, 1, 30),
            (2017, 2, 27), (2017, 4, 3), (2017, 5, 1), (2017, 5, 29), (2017, 7, 3), (2017, 7, 31)]),
    (2018, [(2017, 9, 4), (2017, 10, 2), (2017, 10, 30), (2017, 12, 4), (2018, 1, 1), (2018, 1, 29),
            (2018, 2, 26), (2018, 4, 2), (2018, 4, 30), (2018, 6, 4), (2018, 7, 2), (2018, 7, 30)]),
    (2019, [(2018, 9, 3), (2018, 10, 1), (2018, 10, 29), (2018, 12, 3), (2018, 12, 31), (2019, 2, 4),
            (2019, 3, 4), (2019, 4, 1), (2019, 4, 29), (2019, 6, 3), (2019, 7, 1), (2019, 7, 29)]),
    (2020, [(2019, 9, 2), (2019, 9, 30), (2019, 11, 4), (2019, 12, 2), (2019, 12, 30), (2020, 2, 3),
            (2020, 3, 2), (2020, 3, 30), (2020, 5, 4), (2020, 6, 1), (2020, 6, 29), (2020, 8, 3)]),
    (2021, [(2020, 8, 31), (2020, 9, 28), (2020, 11, 2), (2020, 11, 30), (2021, 1, 4), (2021, 2, 1),
            (2021, 3, 1), (2021, 3, 29), (2021, 5, 3), (2021, 5, 31), (2021, 6, 28), (2021, 8, 2)]),
    (2022, [(2021, 8, 30), (2021, 10, 4), (2021, 11, 1), (2021, 11, 29), (2022, 1, 3), (2022, 1, 31),
            (2022, 2, 28), (2022, 4, 4), (2022, 5, 2), (2022, 5, 30), (2022, 7, 4), (2022, 8, 1)]),
    (2023, [(2022, 8, 29), (2022, 10, 3), (2022, 10, 31), (2022, 11, 28), (2023, 1, 2), (2023, 1, 30),
            (2023, 2, 27), (2023, 4, 3), (2023, 5, 1), (2023, 5, 29), (2023, 7, 3), (2023, 7, 31)]),
    (2024, [(2023, 8, 28), (2023, 10, 2), (2023, 10, 30), (2023, 12, 4), (2024, 1, 1), (2024, 1, 29),
            (2024, 3, 4), (2024, 4, 1), (2024, 4, 29), (2024, 6, 3), (2024, 7, 1), (2024, 7, 29)]),
];

fn table_first_monday(year: i32) -> Option<Day> {
    FIRST_MONDAYS_OF_ACCOUNTING_YEAR
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, (y, m, d))| Day::ymd(*y, *m, *d))
}

fn table_first_day(year: i32, month: u32) -> Option<Day> {
    FIRST_DAY_OF_ACCOUNTING_MONTH
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, months)| {
            let (y, m, d) = months[(month - 1) as usize];
            Day::ymd(y, m, d)
        })
}

/// Whether boundaries for `year` come from the historical tables
pub fn is_table_year(year: i32) -> bool {
    (FIRST_TABLE_YEAR..=LAST_TABLE_YEAR).contains(&year)
}

// ============================================================================
// ACCOUNTING YEAR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountingYear {
    year: i32,
}

impl AccountingYear {
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Find the accounting year whose span contains `day`.
    ///
    /// Only the target year and its two neighbours are candidates.
    pub fn containing(day: Day) -> Result<Self> {
        let target = if day.month() >= 9 {
            day.year() + 1
        } else {
            day.year()
        };
        [target - 1, target, target + 1]
            .into_iter()
            .map(AccountingYear::new)
            .find(|candidate| candidate.contains_day(day))
            .ok_or_else(|| Error::NoAccountingYear(day.to_string()))
    }

    pub fn succ(&self) -> Self {
        Self::new(self.year + 1)
    }

    pub fn pred(&self) -> Self {
        Self::new(self.year - 1)
    }

    pub fn month(&self, month: u32) -> Result<AccountingMonth> {
        AccountingMonth::new(self.year, month)
    }

    pub fn months(&self) -> Vec<AccountingMonth> {
        (1..=12)
            .map(|month| AccountingMonth { year: *self, month })
            .collect()
    }

    /// Number of weeks in the year: 52 or 53
    pub fn num_weeks(&self) -> u32 {
        ((self.succ().first_day() - self.first_day()) / 7) as u32
    }

    pub fn weeks(&self) -> Vec<Week> {
        (1..=self.num_weeks())
            .map(|week_no| Week {
                year: *self,
                week_no,
            })
            .collect()
    }
}

impl DateRange for AccountingYear {
    fn first_day(&self) -> Day {
        table_first_monday(self.year)
            .unwrap_or_else(|| AccountingMonth { year: *self, month: 1 }.first_day())
    }

    fn last_day(&self) -> Day {
        self.succ().first_day().pred()
    }
}

impl Period for AccountingYear {
    fn containing(day: Day) -> Result<Self> {
        AccountingYear::containing(day)
    }

    fn succ(&self) -> Self {
        AccountingYear::succ(self)
    }
}

impl fmt::Display for AccountingYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{:04}", self.year)
    }
}

// ============================================================================
// ACCOUNTING MONTH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountingMonth {
    year: AccountingYear,
    month: u32,
}

impl AccountingMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth { month });
        }
        Ok(Self {
            year: AccountingYear::new(year),
            month,
        })
    }

    pub fn year(&self) -> AccountingYear {
        self.year
    }

    /// Fiscal month number, 1 (September) to 12 (August)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The accounting month nominally matching a calendar month.
    ///
    /// Pure arithmetic: the real boundaries may be a few days either side.
    pub fn from_calendar_month(month: Month) -> Self {
        let (year, fiscal) = if month.month() >= 9 {
            (month.year() + 1, month.month() - 8)
        } else {
            (month.year(), month.month() + 4)
        };
        Self {
            year: AccountingYear::new(year),
            month: fiscal,
        }
    }

    /// Find the accounting month whose span contains `day`.
    ///
    /// Starts from the calendar month's nominal match and moves one month
    /// either way when the boundary falls on the other side of `day`.
    pub fn containing(day: Day) -> Self {
        let naive = Self::from_calendar_month(Month::containing(day));
        if day < naive.first_day() {
            naive - 1
        } else if day > naive.last_day() {
            naive + 1
        } else {
            naive
        }
    }

    pub fn corresponding_calendar_month(&self) -> Month {
        let calendar = self.month + 8;
        let (year, month) = if calendar > 12 {
            (self.year.year(), calendar - 12)
        } else {
            (self.year.year() - 1, calendar)
        };
        Month::new(year, month).expect("fiscal month maps into 1..=12")
    }

    /// The run of whole weeks inside this month (four or five)
    pub fn weeks(&self) -> Vec<Week> {
        let last = self.last_day();
        let mut week = Week {
            year: self.year,
            week_no: ((self.first_day() - self.year.first_day()) / 7) as u32 + 1,
        };
        let mut weeks = Vec::new();
        while week.last_day() <= last {
            let next = week.succ();
            weeks.push(week);
            week = next;
        }
        weeks
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: AccountingYear::new(index.div_euclid(12) as i32),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    fn index(&self) -> i64 {
        i64::from(self.year.year()) * 12 + i64::from(self.month) - 1
    }
}

impl DateRange for AccountingMonth {
    fn first_day(&self) -> Day {
        let year = self.year.year();
        if is_table_year(year) {
            if let Some(day) = table_first_day(year, self.month) {
                return day;
            }
        }
        self.corresponding_calendar_month()
            .first_day()
            .monday_on_or_before()
    }

    fn last_day(&self) -> Day {
        (*self + 1).first_day().pred()
    }
}

impl Period for AccountingMonth {
    fn containing(day: Day) -> Result<Self> {
        Ok(AccountingMonth::containing(day))
    }

    fn succ(&self) -> Self {
        *self + 1
    }
}

impl Add<i32> for AccountingMonth {
    type Output = AccountingMonth;

    fn add(self, months: i32) -> AccountingMonth {
        AccountingMonth::from_index(self.index() + i64::from(months))
    }
}

impl Sub<i32> for AccountingMonth {
    type Output = AccountingMonth;

    fn sub(self, months: i32) -> AccountingMonth {
        AccountingMonth::from_index(self.index() - i64::from(months))
    }
}

impl fmt::Display for AccountingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-M{:02}", self.year, self.month)
    }
}

// ============================================================================
// WEEK
// ============================================================================

/// A Monday-to-Sunday week numbered from the start of its accounting year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week {
    year: AccountingYear,
    week_no: u32,
}

impl Week {
    pub fn new(year: AccountingYear, week_no: u32) -> Result<Self> {
        let max = year.num_weeks();
        if week_no == 0 || week_no > max {
            return Err(Error::InvalidWeek {
                year: year.year(),
                week: week_no,
                max,
            });
        }
        Ok(Self { year, week_no })
    }

    pub fn containing(day: Day) -> Result<Self> {
        let year = AccountingYear::containing(day)?;
        let week_no = ((day - year.first_day()) / 7) as u32 + 1;
        Ok(Self { year, week_no })
    }

    pub fn year(&self) -> AccountingYear {
        self.year
    }

    pub fn week_no(&self) -> u32 {
        self.week_no
    }

    pub fn succ(&self) -> Self {
        if self.week_no < self.year.num_weeks() {
            Self {
                year: self.year,
                week_no: self.week_no + 1,
            }
        } else {
            Self {
                year: self.year.succ(),
                week_no: 1,
            }
        }
    }
}

impl DateRange for Week {
    fn first_day(&self) -> Day {
        self.year.first_day() + i64::from(self.week_no - 1) * 7
    }

    fn last_day(&self) -> Day {
        self.first_day() + 6
    }
}

impl Period for Week {
    fn containing(day: Day) -> Result<Self> {
        Week::containing(day)
    }

    fn succ(&self) -> Self {
        Week::succ(self)
    }
}

impl Add<u32> for Week {
    type Output = Week;

    fn add(self, weeks: u32) -> Week {
        (0..weeks).fold(self, |week, _| week.succ())
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{periods_within, SimpleDateRange};
    use chrono::Weekday;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn test_table_entries_are_mondays() {
        for (_, months) in FIRST_DAY_OF_ACCOUNTING_MONTH.iter() {
            for (y, m, d) in months.iter() {
                assert_eq!(Day::ymd(*y, *m, *d).weekday(), Weekday::Mon);
            }
        }
    }

    #[test]
    fn test_year_table_agrees_with_month_table() {
        for year in FIRST_TABLE_YEAR..=LAST_TABLE_YEAR {
            assert_eq!(
                table_first_monday(year),
                table_first_day(year, 1),
                "year {}",
                year
            );
        }
    }

    #[test]
    fn test_first_day_of_year_is_first_day_of_month_one() {
        for year in 2005..=2040 {
            let y = AccountingYear::new(year);
            assert_eq!(y.first_day(), y.months()[0].first_day(), "year {}", year);
        }
    }

    #[test]
    fn test_table_months_are_four_or_five_weeks() {
        let firsts: Vec<Day> = FIRST_DAY_OF_ACCOUNTING_MONTH
            .iter()
            .flat_map(|(_, months)| months.iter().map(|(y, m, d)| Day::ymd(*y, *m, *d)))
            .collect();
        for pair in firsts.windows(2) {
            let gap = pair[1].days_since(pair[0]);
            assert!(gap == 28 || gap == 35, "{} to {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_table_boundaries() {
        let m = AccountingMonth::new(2016, 7).unwrap();
        assert_eq!(m.first_day(), day("2016-02-29"));
        assert_eq!(m.last_day(), day("2016-04-03"));
        assert_eq!(AccountingYear::new(2024).first_day(), day("2023-08-28"));
        assert_eq!(AccountingYear::new(2024).last_day(), day("2024-08-25"));
    }

    #[test]
    fn test_formula_years() {
        // 1 September 2024 is a Sunday
        let y = AccountingYear::new(2025);
        assert_eq!(y.first_day(), day("2024-08-26"));
        // 1 January 2025 is a Wednesday
        let january = AccountingMonth::new(2025, 5).unwrap();
        assert_eq!(january.first_day(), day("2024-12-30"));
        // 1 September 2011 is a Thursday
        assert_eq!(AccountingYear::new(2012).first_day(), day("2011-08-29"));
    }

    #[test]
    fn test_years_are_contiguous() {
        for year in 2005..=2040 {
            let y = AccountingYear::new(year);
            assert_eq!(y.last_day().succ(), y.succ().first_day(), "year {}", year);
        }
    }

    #[test]
    fn test_years_have_52_or_53_weeks() {
        for year in 2005..=2040 {
            let weeks = AccountingYear::new(year).num_weeks();
            assert!(weeks == 52 || weeks == 53, "year {} has {} weeks", year, weeks);
        }
    }

    #[test]
    fn test_year_containing() {
        for d in SimpleDateRange::new(day("2010-01-01"), day("2030-12-31"))
            .unwrap()
            .days()
        {
            let year = AccountingYear::containing(d).unwrap();
            assert!(year.contains_day(d), "{} not in {}", d, year);
        }
        assert_eq!(
            AccountingYear::containing(day("2015-08-31")).unwrap(),
            AccountingYear::new(2016)
        );
        assert_eq!(
            AccountingYear::containing(day("2015-08-30")).unwrap(),
            AccountingYear::new(2015)
        );
    }

    #[test]
    fn test_month_containing_covers_every_day_exactly_once() {
        for d in SimpleDateRange::new(day("2015-01-01"), day("2025-12-31"))
            .unwrap()
            .days()
        {
            let month = AccountingMonth::containing(d);
            assert!(month.contains_day(d), "{} not in {}", d, month);
            assert!(!(month - 1).contains_day(d));
            assert!(!(month + 1).contains_day(d));
        }
    }

    #[test]
    fn test_months_are_adjacent() {
        let mut month = AccountingMonth::new(2010, 1).unwrap();
        while month.year().year() < 2030 {
            let next = month + 1;
            assert_eq!(month.last_day().succ(), next.first_day(), "{}", month);
            let length = month.num_days();
            assert!(length == 28 || length == 35, "{} has {} days", month, length);
            month = next;
        }
    }

    #[test]
    fn test_month_containing_corrects_naive_guess() {
        // Calendar August, but the new accounting year has already begun
        let month = AccountingMonth::containing(day("2015-08-31"));
        assert_eq!(month, AccountingMonth::new(2016, 1).unwrap());
        // Calendar September, but still in the previous year's final month
        let month = AccountingMonth::containing(day("2012-09-02"));
        assert_eq!(month, AccountingMonth::new(2012, 12).unwrap());
    }

    #[test]
    fn test_from_calendar_month() {
        let sept = Month::new(2022, 9).unwrap();
        assert_eq!(
            AccountingMonth::from_calendar_month(sept),
            AccountingMonth::new(2023, 1).unwrap()
        );
        let jan = Month::new(2023, 1).unwrap();
        assert_eq!(
            AccountingMonth::from_calendar_month(jan),
            AccountingMonth::new(2023, 5).unwrap()
        );
        let aug = Month::new(2023, 8).unwrap();
        assert_eq!(
            AccountingMonth::from_calendar_month(aug),
            AccountingMonth::new(2023, 12).unwrap()
        );
    }

    #[test]
    fn test_corresponding_calendar_month_round_trip() {
        for m in 1..=12 {
            let month = AccountingMonth::new(2023, m).unwrap();
            assert_eq!(
                AccountingMonth::from_calendar_month(month.corresponding_calendar_month()),
                month
            );
        }
        assert_eq!(
            AccountingMonth::new(2023, 1)
                .unwrap()
                .corresponding_calendar_month(),
            Month::new(2022, 9).unwrap()
        );
    }

    #[test]
    fn test_month_arithmetic_wraps_years() {
        let july = AccountingMonth::new(2023, 11).unwrap();
        assert_eq!(july + 2, AccountingMonth::new(2024, 1).unwrap());
        assert_eq!(july - 11, AccountingMonth::new(2022, 12).unwrap());
        assert_eq!(july + 24, AccountingMonth::new(2025, 11).unwrap());
        assert!(AccountingMonth::new(2023, 13).is_err());
    }

    #[test]
    fn test_week_validity() {
        let year = AccountingYear::new(2017);
        assert_eq!(year.num_weeks(), 53);
        assert!(Week::new(year, 0).is_err());
        assert!(Week::new(year, 53).is_ok());
        assert!(Week::new(year, 54).is_err());
        assert!(Week::new(AccountingYear::new(2019), 53).is_err());

        for n in 1..=year.num_weeks() {
            let week = Week::new(year, n).unwrap();
            assert_eq!(week.first_day(), year.first_day() + i64::from(n - 1) * 7);
            assert_eq!(week.num_days(), 7);
        }
    }

    #[test]
    fn test_week_containing_and_succ() {
        let week = Week::containing(day("2023-04-19")).unwrap();
        assert_eq!(week.first_day(), day("2023-04-17"));
        assert!(week.contains_day(day("2023-04-23")));

        let last = Week::new(AccountingYear::new(2023), 52).unwrap();
        let first = last.succ();
        assert_eq!(first.year(), AccountingYear::new(2024));
        assert_eq!(first.week_no(), 1);
        assert_eq!(last.last_day().succ(), first.first_day());
        assert_eq!(last + 1, first);
    }

    #[test]
    fn test_month_weeks_stay_inside_month() {
        for year in 2012..=2026 {
            for month in AccountingYear::new(year).months() {
                let weeks = month.weeks();
                assert!(weeks.len() == 4 || weeks.len() == 5, "{}", month);
                assert_eq!(weeks[0].first_day(), month.first_day());
                assert_eq!(weeks[weeks.len() - 1].last_day(), month.last_day());
                for week in &weeks {
                    assert!(month.contains_range(week));
                }
            }
        }
    }

    #[test]
    fn test_split_year_into_accounting_months() {
        let year = AccountingYear::new(2023);
        let months: Vec<AccountingMonth> = periods_within(&year).unwrap();
        assert_eq!(months, year.months());
        let weeks: Vec<Week> = periods_within(&year).unwrap();
        assert_eq!(weeks.len() as u32, year.num_weeks());
    }
}
