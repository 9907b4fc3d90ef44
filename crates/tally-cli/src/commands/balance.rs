//! Balance command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::{format_amount, parse_day_arg, Session};

/// Start and end of day balances for each account, and combined
pub fn cmd_balance(session: &Session, file: &Path, date: &str, account: Option<&str>) -> Result<()> {
    let day = parse_day_arg(date, "--date")?;
    let mut activity = session.load_activity(file)?;
    if let Some(account) = account {
        activity = activity.restrict_to_accounts(&[account]);
        if activity.accounts().is_empty() {
            anyhow::bail!("No statement for account {}", account);
        }
    }

    println!();
    println!("💷 Balances on {}", day);
    println!("   {:25} │ {:>14} │ {:>14}", "Account", "Start of day", "End of day");
    println!("   ──────────────────────────┼────────────────┼───────────────");

    for statement in activity.statements() {
        let name = session
            .config
            .accounts
            .iter()
            .find(|a| a.id == statement.account())
            .map(|a| format!("{} ({})", a.name, a.id))
            .unwrap_or_else(|| statement.account().to_string());
        let show = |balance: Option<rust_decimal::Decimal>| {
            balance.map(format_amount).unwrap_or_else(|| "-".to_string())
        };
        println!(
            "   {:25} │ {:>14} │ {:>14}",
            name,
            show(statement.balance_at_sod(day)),
            show(statement.balance_at_eod(day))
        );
    }

    let sod = activity
        .balance_at_sod(day)
        .context("Cannot compute combined start of day balance")?;
    let eod = activity
        .balance_at_eod(day)
        .context("Cannot compute combined end of day balance")?;
    println!("   ──────────────────────────┼────────────────┼───────────────");
    println!(
        "   {:25} │ {:>14} │ {:>14}",
        "Total",
        format_amount(sod),
        format_amount(eod)
    );
    Ok(())
}
