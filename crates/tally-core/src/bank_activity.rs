//! Per-account bank statements with reference balances
//!
//! A [`BankStatement`] holds one account's transactions together with the
//! end-of-day balances the bank reported. Balances on other days are derived
//! from the nearest reference balance and the transactions in between.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::PayeeClassifier;
use crate::date::{DateRange, Day};
use crate::error::{Error, Result};
use crate::models::{BalanceRecord, Transaction};
use crate::transactions::{CategoryOverrides, Transactions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StatementParts", into = "StatementParts")]
pub struct BankStatement {
    account: String,
    transactions: Transactions,
    /// End-of-day balances reported by the bank
    balances: BTreeMap<Day, Decimal>,
}

/// Serialized form; balances as a list since JSON map keys must be strings
#[derive(Serialize, Deserialize)]
struct StatementParts {
    account: String,
    transactions: Transactions,
    balances: Vec<(Day, Decimal)>,
}

impl From<StatementParts> for BankStatement {
    fn from(parts: StatementParts) -> Self {
        Self {
            account: parts.account,
            transactions: parts.transactions,
            balances: parts.balances.into_iter().collect(),
        }
    }
}

impl From<BankStatement> for StatementParts {
    fn from(statement: BankStatement) -> Self {
        Self {
            account: statement.account,
            transactions: statement.transactions,
            balances: statement.balances.into_iter().collect(),
        }
    }
}

impl BankStatement {
    /// A statement for `account`; every transaction must belong to it
    pub fn new(
        account: impl Into<String>,
        transactions: Transactions,
        balances: BTreeMap<Day, Decimal>,
    ) -> Result<Self> {
        let account = account.into();
        if let Some(stray) = transactions.iter().find(|t| t.account != account) {
            return Err(Error::AccountMismatch(format!(
                "transaction for {} in statement for {}",
                stray.account, account
            )));
        }
        Ok(Self {
            account,
            transactions,
            balances,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn balances(&self) -> &BTreeMap<Day, Decimal> {
        &self.balances
    }

    fn net_between(&self, after: Day, up_to: Day) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.payment_date > after && t.payment_date <= up_to)
            .map(|t| t.amount)
            .sum()
    }

    /// Balance at the end of `day`, if any reference balance exists
    pub fn balance_at_eod(&self, day: Day) -> Option<Decimal> {
        if let Some((&reference, &balance)) = self.balances.range(..=day).next_back() {
            return Some(balance + self.net_between(reference, day));
        }
        let (&reference, &balance) = self.balances.range(day..).next()?;
        Some(balance - self.net_between(day, reference))
    }

    /// Balance at the start of `day`, i.e. the end of the day before
    pub fn balance_at_sod(&self, day: Day) -> Option<Decimal> {
        self.balance_at_eod(day - 1)
    }

    /// Transactions and balances within `range`, plus the opening balance the day before it
    pub fn restrict_to_period(&self, range: &dyn DateRange) -> Self {
        let opening_day = range.first_day() - 1;
        let mut balances: BTreeMap<Day, Decimal> = self
            .balances
            .range(range.first_day()..=range.last_day())
            .map(|(&day, &balance)| (day, balance))
            .collect();
        if let Some(opening) = self.balance_at_eod(opening_day) {
            balances.insert(opening_day, opening);
        }

        Self {
            account: self.account.clone(),
            transactions: self.transactions.restrict_to_period(range),
            balances,
        }
    }

    fn map_transactions<F: FnOnce(&Transactions) -> Transactions>(&self, f: F) -> Self {
        Self {
            account: self.account.clone(),
            transactions: f(&self.transactions),
            balances: self.balances.clone(),
        }
    }
}

/// Bank statements for a set of accounts, at most one per account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BankStatement>", into = "Vec<BankStatement>")]
pub struct BankActivity {
    statements: BTreeMap<String, BankStatement>,
}

impl BankActivity {
    pub fn new(statements: Vec<BankStatement>) -> Result<Self> {
        let mut by_account = BTreeMap::new();
        for statement in statements {
            let account = statement.account.clone();
            if by_account.insert(account.clone(), statement).is_some() {
                return Err(Error::DuplicateStatement(account));
            }
        }
        Ok(Self {
            statements: by_account,
        })
    }

    /// Build statements from a transaction feed and a balance feed.
    ///
    /// An account may have no reported balances, in which case its balances
    /// cannot be derived. A balance for an account with no transactions is an
    /// `AccountMismatch`.
    pub fn from_feeds(transactions: Vec<Transaction>, balances: Vec<BalanceRecord>) -> Result<Self> {
        let mut by_account: BTreeMap<String, (Vec<Transaction>, BTreeMap<Day, Decimal>)> =
            BTreeMap::new();
        for t in transactions {
            by_account.entry(t.account.clone()).or_default().0.push(t);
        }

        let mut stray: Vec<&str> = balances
            .iter()
            .map(|b| b.account.as_str())
            .filter(|account| !by_account.contains_key(*account))
            .collect();
        stray.sort_unstable();
        stray.dedup();
        if !stray.is_empty() {
            let with_transactions: Vec<&str> = by_account.keys().map(String::as_str).collect();
            return Err(Error::AccountMismatch(format!(
                "balances given for [{}] but transactions only cover [{}]",
                stray.join(", "),
                with_transactions.join(", ")
            )));
        }

        let without_balances: Vec<&str> = by_account
            .keys()
            .map(String::as_str)
            .filter(|account| !balances.iter().any(|b| b.account == *account))
            .collect();
        if !without_balances.is_empty() {
            warn!("No balances reported for {}", without_balances.join(", "));
        }

        for record in balances {
            if let Some((_, account_balances)) = by_account.get_mut(&record.account) {
                account_balances.insert(record.date, record.balance);
            }
        }

        let statements = by_account
            .into_iter()
            .map(|(account, (transactions, balances))| {
                BankStatement::new(account, Transactions::new(transactions), balances)
            })
            .collect::<Result<Vec<_>>>()?;

        let activity = Self::new(statements)?;
        info!(
            "Loaded bank activity for {} accounts, {} transactions",
            activity.statements.len(),
            activity.num_transactions()
        );
        Ok(activity)
    }

    pub fn accounts(&self) -> Vec<&str> {
        self.statements.keys().map(String::as_str).collect()
    }

    pub fn statement(&self, account: &str) -> Option<&BankStatement> {
        self.statements.get(account)
    }

    pub fn statements(&self) -> impl Iterator<Item = &BankStatement> {
        self.statements.values()
    }

    pub fn num_transactions(&self) -> usize {
        self.statements.values().map(|s| s.transactions.len()).sum()
    }

    /// Every account's transactions in one `(payment_date, payee)` ordering
    pub fn transactions(&self) -> Transactions {
        self.statements
            .values()
            .flat_map(|s| s.transactions.iter().cloned())
            .collect()
    }

    pub fn restrict_to_period(&self, range: &dyn DateRange) -> Self {
        self.map_statements(|s| s.restrict_to_period(range))
    }

    pub fn restrict_to_accounts<S: AsRef<str>>(&self, accounts: &[S]) -> Self {
        Self {
            statements: self
                .statements
                .iter()
                .filter(|(account, _)| accounts.iter().any(|a| a.as_ref() == account.as_str()))
                .map(|(account, s)| (account.clone(), s.clone()))
                .collect(),
        }
    }

    /// Combined end-of-day balance across all accounts
    pub fn balance_at_eod(&self, day: Day) -> Result<Decimal> {
        self.statements
            .values()
            .map(|s| {
                s.balance_at_eod(day)
                    .ok_or_else(|| Error::MissingBalance(s.account.clone()))
            })
            .sum()
    }

    /// Combined start-of-day balance across all accounts
    pub fn balance_at_sod(&self, day: Day) -> Result<Decimal> {
        self.balance_at_eod(day - 1)
    }

    /// Apply `classifier` to every uncategorised transaction
    pub fn categorised(&self, classifier: &PayeeClassifier) -> Self {
        self.map_statements(|s| s.map_transactions(|t| t.categorised(classifier)))
    }

    pub fn with_overrides(&self, overrides: &CategoryOverrides) -> Self {
        self.map_statements(|s| s.map_transactions(|t| t.with_overrides(overrides)))
    }

    fn map_statements<F: Fn(&BankStatement) -> BankStatement>(&self, f: F) -> Self {
        Self {
            statements: self
                .statements
                .iter()
                .map(|(account, s)| (account.clone(), f(s)))
                .collect(),
        }
    }
}

impl TryFrom<Vec<BankStatement>> for BankActivity {
    type Error = Error;

    fn try_from(statements: Vec<BankStatement>) -> Result<Self> {
        Self::new(statements)
    }
}

impl From<BankActivity> for Vec<BankStatement> {
    fn from(activity: BankActivity) -> Self {
        activity.statements.into_values().collect()
    }
}
