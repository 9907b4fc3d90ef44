//! Calendar command implementation

use anyhow::Result;
use tally_core::date::is_table_year;
use tally_core::{AccountingYear, DateRange};

/// List the months (or weeks) of an accounting year
pub fn cmd_calendar(year: i32, weeks: bool) -> Result<()> {
    let year = AccountingYear::new(year);

    println!();
    println!(
        "📅 {}: {} to {} ({} weeks)",
        year,
        year.first_day(),
        year.last_day(),
        year.num_weeks()
    );
    if !is_table_year(year.year()) {
        println!("   Boundaries computed: Monday on or before the 1st of each month");
    }
    println!("   ─────────────────────────────────────────────");

    if weeks {
        for week in year.weeks() {
            println!("   {:12} │ {} to {}", week.to_string(), week.first_day(), week.last_day());
        }
    } else {
        for month in year.months() {
            println!(
                "   {:12} │ {} to {} │ {} weeks │ {}",
                month.to_string(),
                month.first_day(),
                month.last_day(),
                month.weeks().len(),
                month.corresponding_calendar_month()
            );
        }
    }
    Ok(())
}
