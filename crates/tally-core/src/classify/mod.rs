//! Rule-chain payee classifier
//!
//! Assigns each bank transaction one [`PayeeCategory`] by trying the rules in
//! [`rules::RULES`] in order. The first rule to match wins; a transaction no
//! rule matches is [`PayeeCategory::Uncategorised`], which is a normal result
//! rather than an error.
//!
//! The classifier carries the two pieces of data the rules need beyond the
//! transaction itself: the club's own bank accounts (for spotting internal
//! transfers) and the list of known musicians (for artist fees).

mod matching;
pub mod rules;

use std::path::Path;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::models::{BankAccount, PayeeCategory, Transaction};

pub use matching::{matches_anywhere, matches_end, matches_start, Needles};
pub use rules::{Rule, RULES};

/// Musician names shipped with the crate, one per line
pub const DEFAULT_MUSICIANS: &str = include_str!("../../resources/musicians.txt");

static DEFAULT_CLASSIFIER: Lazy<PayeeClassifier> = Lazy::new(PayeeClassifier::default);

/// Categorise a transaction with the default accounts and musician list
pub fn category_for_transaction(transaction: &Transaction) -> PayeeCategory {
    DEFAULT_CLASSIFIER.category_for_transaction(transaction)
}

/// Parse a musician list: one name per line, blank lines and `#` comments ignored
pub fn parse_musician_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Clone)]
pub struct PayeeClassifier {
    accounts: Vec<BankAccount>,
    /// Lowercased musician names
    musicians: Vec<String>,
}

impl PayeeClassifier {
    pub fn new(accounts: Vec<BankAccount>, musicians: Vec<String>) -> Self {
        let musicians = musicians
            .into_iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self {
            accounts,
            musicians,
        }
    }

    /// Build from config, reading the musician list from disk if one is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let musicians = match config.classifier.musicians_file.as_deref() {
            Some(path) => Self::read_musicians(path)?,
            None => parse_musician_list(DEFAULT_MUSICIANS),
        };
        Ok(Self::new(config.accounts.clone(), musicians))
    }

    fn read_musicians(path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)?;
        let musicians = parse_musician_list(&text);
        debug!("Loaded {} musicians from {}", musicians.len(), path.display());
        Ok(musicians)
    }

    pub fn accounts(&self) -> &[BankAccount] {
        &self.accounts
    }

    pub fn musicians(&self) -> &[String] {
        &self.musicians
    }

    /// The category of the first matching rule, or `Uncategorised`
    pub fn category_for_transaction(&self, transaction: &Transaction) -> PayeeCategory {
        self.matching_rule(transaction)
            .map(|(_, category)| category)
            .unwrap_or(PayeeCategory::Uncategorised)
    }

    /// Name and result of the first matching rule
    pub fn matching_rule(&self, transaction: &Transaction) -> Option<(&'static str, PayeeCategory)> {
        let hit = RULES
            .iter()
            .find_map(|(name, rule)| rule(self, transaction).map(|category| (*name, category)));

        match hit {
            Some((name, category)) => {
                debug!(
                    "Rule '{}' matched '{}' on {}: {}",
                    name, transaction.payee, transaction.payment_date, category
                );
            }
            None => {
                debug!(
                    "No rule matched '{}' on {}",
                    transaction.payee, transaction.payment_date
                );
            }
        }
        hit
    }
}

impl Default for PayeeClassifier {
    fn default() -> Self {
        Self::new(
            Config::default().accounts,
            parse_musician_list(DEFAULT_MUSICIANS),
        )
    }
}
