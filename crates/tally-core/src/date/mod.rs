//! Days, date ranges and the periods reports are keyed by
//!
//! This module is organized by period family:
//! - `day` - The `Day` value type and its arithmetic
//! - `range` - The `DateRange` capability, explicit ranges, and splitting a range into periods
//! - `calendar` - Calendar months, quarters and years
//! - `accounting` - The fiscal calendar: accounting years, months and weeks

mod accounting;
mod calendar;
mod day;
mod range;

pub use accounting::{is_table_year, AccountingMonth, AccountingYear, Week};
pub use calendar::{Month, Quarter, Year};
pub use day::Day;
pub use range::{periods_within, DateRange, Days, Period, SimpleDateRange};
