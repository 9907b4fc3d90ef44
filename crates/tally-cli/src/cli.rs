//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Categorise bank statements and report by fiscal period
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Payee categorisation and fiscal-period reports for the club's accounts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/tally/config/tally.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache database path (overrides the config file)
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ignore cached statements and re-read them
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorise the transactions in a statement export
    Classify {
        /// Statement CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Hand-edited category sheet whose categories take precedence
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Write the categorised transactions as an editable category sheet
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Only list transactions no rule matched
        #[arg(short, long)]
        uncategorised: bool,
    },

    /// Category totals per accounting month (or per week of one month)
    Report {
        /// Statement CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Hand-edited category sheet whose categories take precedence
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Accounting year, e.g. 2023 for September 2022 to August 2023
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: i32,

        /// Accounting month 1-12 (1 = September)
        #[arg(short, long)]
        month: Option<u32>,

        /// Break the month down by week (requires --month)
        #[arg(short, long, requires = "month")]
        weekly: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// VAT-able and exempt income and expenditure over a date range
    Vat {
        /// Statement CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Hand-edited category sheet whose categories take precedence
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// First day (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        from: String,

        /// Last day, inclusive (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        to: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Account balances at the start and end of a day
    Balance {
        /// Statement CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Day (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        date: String,

        /// Only this account id
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show the fiscal calendar for an accounting year
    Calendar {
        /// Accounting year
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: i32,

        /// List every week instead of every month
        #[arg(short, long)]
        weeks: bool,
    },

    /// Manage the statement cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached entries
    List,

    /// Remove every cached entry
    Clear,
}
