//! Shared session state and statement loading
//!
//! This module contains:
//! - `Session` - Config, cache and classifier for one run
//! - `open_session` - Resolve config and open the cache
//! - `Session::load_activity` - Read a statement through the cache and categorise it
//! - `Session::load_transactions` - The same, with a hand-edited category sheet applied

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::cache::cache_key;
use tally_core::import::{load_bank_activity, parse_date, parse_overrides_csv};
use tally_core::{BankActivity, Cache, CategoryOverrides, Config, Day, PayeeClassifier, Transactions};
use tracing::{debug, info};

pub struct Session {
    pub config: Config,
    pub cache: Cache,
    pub classifier: PayeeClassifier,
    /// Re-read statements even when cached
    pub force: bool,
}

impl Session {
    pub fn new(config: Config, cache: Cache, force: bool) -> Result<Self> {
        let classifier =
            PayeeClassifier::from_config(&config).context("Failed to load musician list")?;
        Ok(Self {
            config,
            cache,
            classifier,
            force,
        })
    }

    /// Cache key for a statement: its contents plus the configured accounts
    pub fn statement_key(&self, contents: &[u8]) -> String {
        let mut keyed = contents.to_vec();
        for id in self.config.account_ids() {
            keyed.push(b'\n');
            keyed.extend_from_slice(id.as_bytes());
        }
        cache_key("bank_activity", &keyed)
    }

    /// Load a statement (cached by content) and categorise it
    pub fn load_activity(&self, file: &Path) -> Result<BankActivity> {
        let contents = std::fs::read(file)
            .with_context(|| format!("Failed to read statement {}", file.display()))?;
        let key = self.statement_key(&contents);
        debug!("Statement cache key {}", key);

        let activity = self
            .cache
            .get_or_compute(&key, self.force, || {
                load_bank_activity(file, &self.config.accounts)
            })
            .with_context(|| format!("Failed to load statement {}", file.display()))?;

        Ok(activity.categorised(&self.classifier))
    }

    /// All categorised transactions of a statement, with any hand-edited categories applied
    pub fn load_transactions(&self, file: &Path, overrides: Option<&Path>) -> Result<Transactions> {
        let mut activity = self.load_activity(file)?;
        if let Some(path) = overrides {
            let overrides = load_overrides(path)?;
            info!("Applying {} hand-edited categories", overrides.len());
            activity = activity.with_overrides(&overrides);
        }
        Ok(activity.transactions())
    }
}

/// Read a hand-edited category sheet
pub fn load_overrides(path: &Path) -> Result<CategoryOverrides> {
    let sheet = File::open(path)
        .with_context(|| format!("Failed to open category sheet {}", path.display()))?;
    parse_overrides_csv(sheet)
        .with_context(|| format!("Failed to parse category sheet {}", path.display()))
}

/// Load config and open the cache
pub fn open_session(config_path: Option<&Path>, cache_path: Option<&Path>, force: bool) -> Result<Session> {
    let config = Config::load(config_path).context("Failed to load config")?;

    let cache_path = match cache_path {
        Some(path) => path.to_path_buf(),
        None => config
            .cache_path()
            .context("No cache path configured and no local data directory found")?,
    };
    let cache = Cache::open(&cache_path)
        .with_context(|| format!("Failed to open cache at {}", cache_path.display()))?;

    Session::new(config, cache, force)
}

/// Parse a day given on the command line
pub fn parse_day_arg(s: &str, flag: &str) -> Result<Day> {
    parse_date(s).with_context(|| format!("Invalid {} date (use YYYY-MM-DD or DD/MM/YYYY)", flag))
}
