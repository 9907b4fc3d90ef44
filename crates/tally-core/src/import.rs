//! CSV ingestion of bank statements and the category override sheet
//!
//! Statement exports have the header
//! `account,date,ftid,type,payee,amount,balance`, where `balance` is the
//! running balance after the row and may be left blank. Rows are in
//! chronological order, so the last balance given for a day is that day's
//! closing balance.
//!
//! The override sheet is what [`write_categorised_csv`] produces, edited by
//! hand: `account,date,ftid,payee,amount,category`. A blank category leaves
//! the classifier's choice alone. The `ftid` column may be blank or missing,
//! in which case the row applies to every transaction with the same account,
//! date, payee and amount.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::bank_activity::BankActivity;
use crate::date::Day;
use crate::error::{Error, Result};
use crate::models::{BalanceRecord, BankAccount, PayeeCategory, Transaction};
use crate::transactions::{CategoryOverrides, Transactions};

const STATEMENT_COLUMNS: [&str; 7] = ["account", "date", "ftid", "type", "payee", "amount", "balance"];
const OVERRIDE_COLUMNS: [&str; 6] = ["account", "date", "ftid", "payee", "amount", "category"];
const REQUIRED_OVERRIDE_COLUMNS: [&str; 5] = ["account", "date", "payee", "amount", "category"];

/// Column positions looked up by header name
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn new(headers: &StringRecord, required: &[&str]) -> Result<Self> {
        let columns = Self {
            headers: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        };
        for name in required {
            if columns.index(name).is_none() {
                return Err(Error::Import(format!("Missing column: {}", name)));
            }
        }
        Ok(columns)
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Trimmed value, `None` when the column is absent or the cell blank
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index(name)
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn require<'r>(&self, record: &'r StringRecord, name: &str, line: u64) -> Result<&'r str> {
        self.get(record, name)
            .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse a statement date: `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(s: &str) -> Result<Day> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2023-04-17
        "%d/%m/%Y", // 17/04/2023
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Day::from_date(date));
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount, ignoring a pound sign, thousands separators and spaces
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().replace(['£', ',', ' '], "");

    Decimal::from_str(&cleaned).map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

/// Parse a statement export into transactions and end-of-day balances
pub fn parse_statement_csv<R: Read>(reader: R) -> Result<(Vec<Transaction>, Vec<BalanceRecord>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?, &STATEMENT_COLUMNS[..6])?;
    let mut transactions = Vec::new();
    let mut closing: BTreeMap<(String, Day), Decimal> = BTreeMap::new();

    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);

        let account = columns.require(&record, "account", line)?.to_string();
        let date = parse_date(columns.require(&record, "date", line)?)?;
        let payee = columns.require(&record, "payee", line)?.to_string();
        let amount = parse_amount(columns.require(&record, "amount", line)?)?;

        let mut transaction = Transaction::new(account.clone(), date, payee, amount);
        if let Some(ftid) = columns.get(&record, "ftid") {
            transaction = transaction.with_ftid(ftid);
        }
        if let Some(transaction_type) = columns.get(&record, "type") {
            transaction = transaction.with_type(transaction_type);
        }
        transactions.push(transaction);

        if let Some(balance) = columns.get(&record, "balance") {
            closing.insert((account, date), parse_amount(balance)?);
        }
    }

    let balances: Vec<BalanceRecord> = closing
        .into_iter()
        .map(|((account, date), balance)| BalanceRecord {
            account,
            date,
            balance,
        })
        .collect();

    debug!(
        "Parsed {} statement rows, {} closing balances",
        transactions.len(),
        balances.len()
    );
    Ok((transactions, balances))
}

/// Load a statement file as bank activity for the configured accounts.
///
/// Rows for an account that is not configured are rejected.
pub fn load_bank_activity(path: &Path, accounts: &[BankAccount]) -> Result<BankActivity> {
    let file = File::open(path)
        .map_err(|e| Error::Import(format!("Failed to open {}: {}", path.display(), e)))?;
    let (transactions, balances) = parse_statement_csv(file)?;

    let unknown = transactions
        .iter()
        .map(|t| t.account.as_str())
        .chain(balances.iter().map(|b| b.account.as_str()))
        .find(|id| !accounts.iter().any(|a| a.id == *id));
    if let Some(id) = unknown {
        return Err(Error::AccountMismatch(format!(
            "{} contains account {} which is not configured",
            path.display(),
            id
        )));
    }

    info!("Imported {} transactions from {}", transactions.len(), path.display());
    BankActivity::from_feeds(transactions, balances)
}

/// Parse the hand-edited override sheet
pub fn parse_overrides_csv<R: Read>(reader: R) -> Result<CategoryOverrides> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?, &REQUIRED_OVERRIDE_COLUMNS)?;
    let mut overrides = CategoryOverrides::new();

    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);

        let Some(category) = columns.get(&record, "category") else {
            continue;
        };
        let category = PayeeCategory::from_str(category)?;

        let mut key = Transaction::new(
            columns.require(&record, "account", line)?,
            parse_date(columns.require(&record, "date", line)?)?,
            columns.require(&record, "payee", line)?,
            parse_amount(columns.require(&record, "amount", line)?)?,
        );
        if let Some(ftid) = columns.get(&record, "ftid") {
            key = key.with_ftid(ftid);
        }
        overrides.insert(&key, category);
    }

    debug!("Parsed {} category overrides", overrides.len());
    Ok(overrides)
}

/// Write transactions in the override sheet format.
///
/// Uncategorised rows get a blank category, so re-importing the sheet
/// unedited changes nothing.
pub fn write_categorised_csv<W: Write>(writer: W, transactions: &Transactions) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(OVERRIDE_COLUMNS)?;

    for t in transactions {
        let date = t.payment_date.to_string();
        let amount = t.amount.to_string();
        let category = match t.category {
            PayeeCategory::Uncategorised => "",
            other => other.as_str(),
        };
        wtr.write_record([
            t.account.as_str(),
            date.as_str(),
            t.ftid.as_deref().unwrap_or(""),
            t.payee.as_str(),
            amount.as_str(),
            category,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
