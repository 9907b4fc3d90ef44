//! Classify command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::import::write_categorised_csv;
use tally_core::{PayeeCategory, Transactions};

use super::{format_amount, truncate, Session};

/// Categorise a statement, apply any hand-edited categories, and optionally export the sheet
pub fn cmd_classify(
    session: &Session,
    file: &Path,
    overrides: Option<&Path>,
    export: Option<&Path>,
    uncategorised_only: bool,
) -> Result<()> {
    let transactions = session.load_transactions(file, overrides)?;

    let shown = if uncategorised_only {
        transactions.restrict_to_category(PayeeCategory::Uncategorised)
    } else {
        transactions.clone()
    };
    print_transactions(&shown);

    let uncategorised = transactions
        .restrict_to_category(PayeeCategory::Uncategorised)
        .len();
    println!();
    println!(
        "   {} transactions, {} uncategorised ({})",
        transactions.len(),
        uncategorised,
        format_amount(transactions.uncategorised_total())
    );

    let duplicates = transactions.duplicates();
    if !duplicates.is_empty() {
        println!("   ⚠️  {} possible duplicate rows:", duplicates.len());
        for (a, _) in duplicates {
            println!("      {} {} {}", a.payment_date, a.payee, format_amount(a.amount));
        }
    }

    if let Some(path) = export {
        let out = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_categorised_csv(out, &transactions)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✅ Wrote category sheet to {}", path.display());
    }

    Ok(())
}

fn print_transactions(transactions: &Transactions) {
    println!();
    println!(
        "   {:10} │ {:8} │ {:>12} │ {:20} │ Payee",
        "Date", "Account", "Amount", "Category"
    );
    println!("   ───────────┼──────────┼──────────────┼──────────────────────┼──────────────────────────────");

    for t in transactions {
        println!(
            "   {:10} │ {:8} │ {:>12} │ {:20} │ {}",
            t.payment_date.to_string(),
            truncate(&t.account, 8),
            format_amount(t.amount),
            t.category.as_str(),
            truncate(&t.payee, 40)
        );
    }
}
