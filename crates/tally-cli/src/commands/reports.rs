//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::reports::{accounting_year_report, weekly_report};
use tally_core::{AccountingMonth, AccountingYear, PeriodSummary, SimpleDateRange, VatSummary};

use super::{format_amount, parse_day_arg, Session};

/// Category totals per accounting month of a year, or per week of one month
pub fn cmd_report(
    session: &Session,
    file: &Path,
    overrides: Option<&Path>,
    year: i32,
    month: Option<u32>,
    weekly: bool,
    json: bool,
) -> Result<()> {
    let transactions = session.load_transactions(file, overrides)?;
    let year = AccountingYear::new(year);

    let summaries = match month {
        Some(month) => {
            let month = AccountingMonth::new(year.year(), month).context("Invalid --month")?;
            if weekly {
                weekly_report(&transactions, month)
            } else {
                vec![PeriodSummary::for_range(month.to_string(), &month, &transactions)]
            }
        }
        None => accounting_year_report(&transactions, year),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        print_summary(summary);
    }
    Ok(())
}

pub fn print_summary(summary: &PeriodSummary) {
    println!();
    println!(
        "📊 {}  ({} to {})",
        summary.label, summary.first_day, summary.last_day
    );
    println!("   ─────────────────────────────────────────────");

    if summary.totals.is_empty() {
        println!("   No transactions in this period.");
        return;
    }

    for (category, amount) in &summary.totals {
        println!("   {:25} │ {:>14}", category.as_str(), format_amount(*amount));
    }
    println!("   ──────────────────────────┼───────────────");
    println!("   {:25} │ {:>14}", "Total", format_amount(summary.total));
    if !summary.uncategorised.is_zero() {
        println!(
            "   {:25} │ {:>14}",
            "\x1b[2mof which uncategorised\x1b[0m",
            format_amount(summary.uncategorised)
        );
    }
}

/// VAT-able and exempt totals over an inclusive date range
pub fn cmd_vat(
    session: &Session,
    file: &Path,
    overrides: Option<&Path>,
    from: &str,
    to: &str,
    json: bool,
) -> Result<()> {
    let range = SimpleDateRange::new(parse_day_arg(from, "--from")?, parse_day_arg(to, "--to")?)
        .context("Invalid date range")?;
    let transactions = session.load_transactions(file, overrides)?;
    let vat = VatSummary::for_range(&range, &transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&vat)?);
        return Ok(());
    }

    println!();
    println!("🧾 VAT summary  ({})", range);
    println!("   ─────────────────────────────────────────────");
    println!("   {:25} │ {:>14}", "VAT-able income", format_amount(vat.vatable_income));
    println!("   {:25} │ {:>14}", "Exempt income", format_amount(vat.exempt_income));
    println!("   {:25} │ {:>14}", "VAT-able expenditure", format_amount(vat.vatable_expenditure));
    println!("   {:25} │ {:>14}", "Exempt expenditure", format_amount(vat.exempt_expenditure));
    println!("   {:25} │ {:>14}", "Settled with HMRC", format_amount(vat.vat_settled));
    println!("   ──────────────────────────┼───────────────");
    println!("   {:25} │ {:>14}", "Output VAT (20%)", format_amount(vat.output_vat()));
    println!("   {:25} │ {:>14}", "Input VAT (20%)", format_amount(vat.input_vat()));
    if !vat.uncategorised.is_zero() {
        println!(
            "   ⚠️  {} uncategorised is not included above",
            format_amount(vat.uncategorised)
        );
    }
    Ok(())
}
