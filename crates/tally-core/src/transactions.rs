//! Ordered transaction collections and their aggregate queries
//!
//! A [`Transactions`] is always sorted by `(payment_date, payee)`, so report
//! rows come out in the same order whatever order the statements were read
//! in. Every filter returns a new collection and leaves the source untouched.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::PayeeClassifier;
use crate::date::{DateRange, Day};
use crate::error::{Error, Result};
use crate::models::{PayeeCategory, Transaction};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Transaction>", into = "Vec<Transaction>")]
pub struct Transactions {
    transactions: Vec<Transaction>,
}

impl Transactions {
    pub fn new(mut transactions: Vec<Transaction>) -> Self {
        // Stable, so rows with equal keys keep their statement order
        transactions.sort_by(|a, b| {
            a.payment_date
                .cmp(&b.payment_date)
                .then_with(|| a.payee.cmp(&b.payee))
        });
        Self { transactions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// First and last payment dates, if any
    pub fn date_span(&self) -> Option<(Day, Day)> {
        Some((
            self.transactions.first()?.payment_date,
            self.transactions.last()?.payment_date,
        ))
    }

    fn filtered<F: Fn(&Transaction) -> bool>(&self, keep: F) -> Self {
        // Filtering a sorted list keeps it sorted
        Self {
            transactions: self
                .transactions
                .iter()
                .filter(|t| keep(t))
                .cloned()
                .collect(),
        }
    }

    /// Transactions dated within `range`, both ends inclusive
    pub fn restrict_to_period(&self, range: &dyn DateRange) -> Self {
        self.filtered(|t| range.contains_day(t.payment_date))
    }

    pub fn restrict_to_category(&self, category: PayeeCategory) -> Self {
        self.filtered(|t| t.category == category)
    }

    pub fn restrict_to_categories(&self, categories: &[PayeeCategory]) -> Self {
        self.filtered(|t| categories.contains(&t.category))
    }

    pub fn restrict_to_accounts<S: AsRef<str>>(&self, accounts: &[S]) -> Self {
        self.filtered(|t| accounts.iter().any(|a| a.as_ref() == t.account))
    }

    /// Sum of every amount, whatever its category
    pub fn total_amount(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Sum over the union of `categories`.
    ///
    /// An empty slice selects nothing and totals zero; use
    /// [`Transactions::total_amount`] for everything.
    pub fn total_for(&self, categories: &[PayeeCategory]) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| categories.contains(&t.category))
            .map(|t| t.amount)
            .sum()
    }

    pub fn uncategorised_total(&self) -> Decimal {
        self.total_for(&[PayeeCategory::Uncategorised])
    }

    /// Total per category present, in category order
    pub fn totals_by_category(&self) -> BTreeMap<PayeeCategory, Decimal> {
        let mut totals = BTreeMap::new();
        for t in &self.transactions {
            *totals.entry(t.category).or_insert(Decimal::ZERO) += t.amount;
        }
        totals
    }

    /// Union of two disjoint collections.
    ///
    /// A transaction present in both (compared on every field) is an error:
    /// it almost always means a statement was imported twice.
    pub fn merge(&self, other: &Transactions) -> Result<Self> {
        let mine: HashSet<&Transaction> = self.transactions.iter().collect();
        if let Some(shared) = other.transactions.iter().find(|t| mine.contains(t)) {
            return Err(Error::DuplicateTransaction(format!(
                "{} {} {} {} appears in both collections",
                shared.account, shared.payment_date, shared.payee, shared.amount
            )));
        }

        let mut combined = self.transactions.clone();
        combined.extend(other.transactions.iter().cloned());
        Ok(Self::new(combined))
    }

    /// Pairs of transactions that are equal in every field but category
    pub fn duplicates(&self) -> Vec<(&Transaction, &Transaction)> {
        let mut pairs = Vec::new();
        // Duplicates share a date, so only same-day neighbours need comparing
        for (i, a) in self.transactions.iter().enumerate() {
            for b in self.transactions[i + 1..]
                .iter()
                .take_while(|b| b.payment_date == a.payment_date)
            {
                if a.is_duplicate_of(b) {
                    pairs.push((a, b));
                }
            }
        }
        if !pairs.is_empty() {
            warn!("Found {} duplicate-looking transaction pairs", pairs.len());
        }
        pairs
    }

    /// Apply `classifier` to every transaction still uncategorised
    pub fn categorised(&self, classifier: &PayeeClassifier) -> Self {
        let transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .map(|t| match t.category {
                PayeeCategory::Uncategorised => {
                    t.with_category(classifier.category_for_transaction(t))
                }
                _ => t.clone(),
            })
            .collect();

        let remaining = transactions
            .iter()
            .filter(|t| t.category == PayeeCategory::Uncategorised)
            .count();
        debug!(
            "Categorised {} transactions, {} uncategorised",
            transactions.len(),
            remaining
        );
        Self { transactions }
    }

    /// Replace categories with the ones a human has entered, where present
    pub fn with_overrides(&self, overrides: &CategoryOverrides) -> Self {
        let mut applied = 0;
        let transactions = self
            .transactions
            .iter()
            .map(|t| match overrides.category_for(t) {
                Some(category) => {
                    applied += 1;
                    t.with_category(category)
                }
                None => t.clone(),
            })
            .collect();
        debug!("Applied {} category overrides", applied);
        Self { transactions }
    }
}

impl From<Vec<Transaction>> for Transactions {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}

impl From<Transactions> for Vec<Transaction> {
    fn from(transactions: Transactions) -> Self {
        transactions.transactions
    }
}

impl FromIterator<Transaction> for Transactions {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Identifies a statement row independently of its category
type OverrideKey = (String, Day, Option<String>, String, Decimal);

/// Categories entered by hand in the override sheet.
///
/// Rows are matched on account, date, bank transaction id, payee and amount.
/// An entry without a transaction id matches any row with the same account,
/// date, payee and amount. A row with no category entered is not an override.
#[derive(Debug, Clone, Default)]
pub struct CategoryOverrides {
    categories: HashMap<OverrideKey, PayeeCategory>,
}

impl CategoryOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(t: &Transaction, ftid: Option<&str>) -> OverrideKey {
        (
            t.account.clone(),
            t.payment_date,
            ftid.map(str::to_string),
            t.payee.clone(),
            t.amount,
        )
    }

    /// Record `category` for rows matching `transaction`; the transaction's own category is ignored
    pub fn insert(&mut self, transaction: &Transaction, category: PayeeCategory) {
        self.categories
            .insert(Self::key(transaction, transaction.ftid.as_deref()), category);
    }

    pub fn category_for(&self, transaction: &Transaction) -> Option<PayeeCategory> {
        let exact = self
            .categories
            .get(&Self::key(transaction, transaction.ftid.as_deref()));
        match (exact, &transaction.ftid) {
            (Some(category), _) => Some(*category),
            (None, Some(_)) => self.categories.get(&Self::key(transaction, None)).copied(),
            (None, None) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
