//! Error types for tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid month {month} (must be 1-12)")]
    InvalidMonth { month: u32 },

    #[error("Invalid quarter {quarter} (must be 1-4)")]
    InvalidQuarter { quarter: u32 },

    #[error("Invalid week {week} for accounting year {year} (must be 1-{max})")]
    InvalidWeek { year: i32, week: u32, max: u32 },

    #[error("Invalid date range: {first} is after {last}")]
    InvalidRange { first: String, last: String },

    #[error("No accounting year contains {0}")]
    NoAccountingYear(String),

    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    #[error("Account mismatch: {0}")]
    AccountMismatch(String),

    #[error("More than one statement for account {0}")]
    DuplicateStatement(String),

    #[error("No balance available for account {0}")]
    MissingBalance(String),

    #[error("Unknown payee category: {0}")]
    UnknownCategory(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
