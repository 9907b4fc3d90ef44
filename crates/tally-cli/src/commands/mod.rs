//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `classify` - Categorise a statement, apply and export the category sheet
//! - `reports` - Accounting month/week reports and the VAT summary
//! - `balance` - Start and end of day balances
//! - `calendar` - Fiscal calendar listing
//! - `cache` - Statement cache management (list, clear)
//! - `session` - Shared session (config, cache, classifier) and statement loading

pub mod balance;
pub mod cache;
pub mod calendar;
pub mod classify;
pub mod reports;
pub mod session;

// Re-export command functions for main.rs
pub use balance::*;
pub use cache::*;
pub use calendar::*;
pub use classify::*;
pub use reports::*;
pub use session::*;

use rust_decimal::Decimal;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount in pounds with thousands separators, e.g. `-£1,234.50`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let text = format!("{:.2}", rounded);
    let (whole, pence) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}£{}.{}", sign, grouped, pence)
}
