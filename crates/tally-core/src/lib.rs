//! Tally Core Library
//!
//! Shared functionality for the tally reconciliation scripts:
//! - Calendar and fiscal-calendar periods (accounting years, months, weeks)
//! - Rule-chain payee classifier assigning a category to each bank transaction
//! - Transaction collections and per-account bank activity with balances
//! - Period and VAT report aggregates
//! - CSV ingestion of bank statements and category override sheets
//! - Local key-value cache for memoizing expensive loads

pub mod bank_activity;
pub mod cache;
pub mod classify;
pub mod config;
pub mod date;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;
pub mod transactions;

pub use bank_activity::{BankActivity, BankStatement};
pub use cache::{Cache, CacheEntry};
pub use classify::{category_for_transaction, PayeeClassifier};
pub use config::Config;
pub use date::{
    periods_within, AccountingMonth, AccountingYear, DateRange, Day, Month, Period, Quarter,
    SimpleDateRange, Week, Year,
};
pub use error::{Error, Result};
pub use models::{BalanceRecord, BankAccount, PayeeCategory, Transaction};
pub use reports::{PeriodSummary, VatSummary};
pub use transactions::{CategoryOverrides, Transactions};
