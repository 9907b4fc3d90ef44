//! Tally CLI - Bank statement categorisation and fiscal-period reports
//!
//! Usage:
//!   tally classify --file CSV          Categorise a statement export
//!   tally report --file CSV --year Y   Category totals per accounting month
//!   tally vat --file CSV --from D --to D
//!   tally balance --file CSV --date D  Start and end of day balances
//!   tally calendar --year Y            Show the fiscal calendar
//!   tally cache list|clear             Manage the statement cache

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let open = || commands::open_session(cli.config.as_deref(), cli.cache.as_deref(), cli.force);

    match cli.command {
        // The calendar needs no config or cache
        Commands::Calendar { year, weeks } => commands::cmd_calendar(year, weeks),
        Commands::Classify {
            ref file,
            ref overrides,
            ref export,
            uncategorised,
        } => commands::cmd_classify(
            &open()?,
            file,
            overrides.as_deref(),
            export.as_deref(),
            uncategorised,
        ),
        Commands::Report {
            ref file,
            ref overrides,
            year,
            month,
            weekly,
            json,
        } => commands::cmd_report(
            &open()?,
            file,
            overrides.as_deref(),
            year,
            month,
            weekly,
            json,
        ),
        Commands::Vat {
            ref file,
            ref overrides,
            ref from,
            ref to,
            json,
        } => commands::cmd_vat(&open()?, file, overrides.as_deref(), from, to, json),
        Commands::Balance {
            ref file,
            ref date,
            ref account,
        } => commands::cmd_balance(&open()?, file, date, account.as_deref()),
        Commands::Cache { ref action } => {
            let session = open()?;
            match action {
                CacheAction::List => commands::cmd_cache_list(&session),
                CacheAction::Clear => commands::cmd_cache_clear(&session),
            }
        }
    }
}
