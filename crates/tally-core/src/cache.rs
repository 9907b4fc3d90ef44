//! Local key-value cache for expensive loads
//!
//! Values are stored as JSON documents in a single SQLite table, keyed by a
//! string derived from whatever produced them (e.g. `bank_activity_<digest>`).
//! Callers go through [`Cache::get_or_compute`]: a hit returns the stored
//! value, a miss or a forced refresh recomputes and overwrites it.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::Result;

/// A cached entry as listed by [`Cache::entries`]
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    /// Size of the stored JSON document in bytes
    pub size: usize,
    pub updated_at: DateTime<Utc>,
}

pub struct Cache {
    conn: Connection,
    path: String,
}

/// Cache key for content-addressed data: `<prefix>_<sha256 of content>`
pub fn cache_key(prefix: &str, content: &[u8]) -> String {
    format!("{}_{}", prefix, hex::encode(Sha256::digest(content)))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

impl Cache {
    /// Open (creating if needed) the cache database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let cache = Self {
            conn,
            path: path.display().to_string(),
        };
        cache.run_migrations()?;
        Ok(cache)
    }

    /// Create an in-memory cache (for testing)
    pub fn in_memory() -> Result<Self> {
        let cache = Self {
            conn: Connection::open_in_memory()?,
            path: ":memory:".to_string(),
        };
        cache.run_migrations()?;
        Ok(cache)
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// Get the path to the cache database
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM cache WHERE key = ?", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM cache WHERE key = ?", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            r#"
            INSERT INTO cache (key, value, updated_at) VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, json],
        )?;
        debug!("Cached {} ({} bytes)", key, json.len());
        Ok(())
    }

    /// Remove one entry, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM cache WHERE key = ?", params![key])?;
        Ok(removed > 0)
    }

    /// Remove every entry, returning how many there were
    pub fn clear(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM cache", [])?;
        info!("Cleared {} cache entries", removed);
        Ok(removed)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM cache ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, length(value), updated_at FROM cache ORDER BY key")?;
        let entries = stmt
            .query_map([], |row| {
                let size: i64 = row.get(1)?;
                let updated_at: String = row.get(2)?;
                Ok(CacheEntry {
                    key: row.get(0)?,
                    size: size as usize,
                    updated_at: parse_datetime(&updated_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// With `force` the stored value is ignored and overwritten.
    pub fn get_or_compute<T, F>(&self, key: &str, force: bool, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if !force {
            if let Some(value) = self.get(key)? {
                debug!("Cache hit for {}", key);
                return Ok(value);
            }
        }

        info!(
            "{} {}",
            if force { "Refreshing" } else { "Computing" },
            key
        );
        let value = compute()?;
        self.set(key, &value)?;
        Ok(value)
    }
}
