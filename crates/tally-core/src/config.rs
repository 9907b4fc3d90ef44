//! Accounts, classifier and cache configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, else an override in the data dir
//!    (~/.local/share/tally/config/tally.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::BankAccount;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub accounts: Vec<BankAccount>,
    pub classifier: ClassifierConfig,
    pub cache: CacheConfig,
}

/// A config file as written; a file without `[[accounts]]` keeps the embedded ones
#[derive(Deserialize)]
struct ConfigFile {
    accounts: Option<Vec<BankAccount>>,
    #[serde(default)]
    classifier: ClassifierConfig,
    #[serde(default)]
    cache: CacheConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Musician list to use instead of the built-in one
    pub musicians_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: Option<PathBuf>,
}

impl Default for Config {
    /// The embedded config
    fn default() -> Self {
        Self::embedded().unwrap_or_else(|e| {
            warn!("Embedded config is invalid, using no accounts: {}", e);
            Self {
                accounts: Vec::new(),
                classifier: ClassifierConfig::default(),
                cache: CacheConfig::default(),
            }
        })
    }
}

impl Config {
    /// Load from `path` if given, else the data-dir override, else the embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(default_path) if default_path.exists() => Self::from_file(&default_path),
            _ => Self::embedded(),
        }
    }

    /// The config compiled into the binary
    pub fn embedded() -> Result<Self> {
        let file: ConfigFile = toml::from_str(DEFAULT_CONFIG)?;
        let accounts = file
            .accounts
            .ok_or_else(|| Error::Config("Embedded config lists no accounts".to_string()))?;
        Self::validated(accounts, file.classifier, file.cache)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let accounts = match file.accounts {
            Some(accounts) => accounts,
            None => Self::embedded()?.accounts,
        };
        Self::validated(accounts, file.classifier, file.cache)
    }

    fn validated(
        accounts: Vec<BankAccount>,
        classifier: ClassifierConfig,
        cache: CacheConfig,
    ) -> Result<Self> {
        for (i, account) in accounts.iter().enumerate() {
            if account.id.trim().is_empty() {
                return Err(Error::Config(format!("Account {} has an empty id", i + 1)));
            }
            if accounts[..i].iter().any(|a| a.id == account.id) {
                return Err(Error::Config(format!(
                    "Account {} is listed more than once",
                    account.id
                )));
            }
        }

        Ok(Self {
            accounts,
            classifier,
            cache,
        })
    }

    /// Configured cache path, else the platform default
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache.path.clone().or_else(default_cache_path)
    }

    pub fn account_ids(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.id.clone()).collect()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("tally.toml"))
}

/// Default cache database path
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("cache.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_embedded_file() {
        let config = Config::embedded().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.account_ids(), vec!["40123456", "70991234", "41223344"]);

        let file: toml::Value = toml::from_str(DEFAULT_CONFIG).unwrap();
        let ids: Vec<&str> = file["accounts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(Config::default().account_ids(), ids);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[cache]\npath = \"/tmp/tally.db\"\n").unwrap();
        assert!(config.classifier.musicians_file.is_none());
        assert_eq!(config.cache_path(), Some(PathBuf::from("/tmp/tally.db")));
        // An explicit file without [[accounts]] keeps the default accounts
        assert_eq!(config.accounts.len(), 3);
    }

    #[test]
    fn test_custom_accounts() {
        let config = Config::parse(
            r#"
            [[accounts]]
            id = "11112222"
            name = "Only account"
            "#,
        )
        .unwrap();
        assert_eq!(config.accounts, vec![BankAccount::new("11112222", "Only account")]);
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let err = Config::parse(
            r#"
            [[accounts]]
            id = "1"
            name = "A"

            [[accounts]]
            id = "1"
            name = "B"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Config::parse("accounts = 3"), Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "[[accounts]]\nid = \"5\"\nname = \"Five\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.account_ids(), vec!["5"]);

        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(Error::Config(_))));
    }
}
