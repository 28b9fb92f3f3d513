//! Generic JSON key-value access.
//!
//! Reads degrade to `None` and writes to `false` on any storage or
//! serialization failure; the failure is logged, never propagated.

use rusqlite::OptionalExtension;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Database, DbError};

impl Database {
    fn try_get_raw(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    fn try_set_raw(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    /// Raw stored string for `key`.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.try_get_raw(key)
            .inspect_err(|e| tracing::warn!(key, error = %e, "Failed to read key"))
            .ok()
            .flatten()
    }

    /// Store a raw string without JSON encoding.
    pub fn set_raw(&self, key: &str, value: &str) -> bool {
        match self.try_set_raw(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to write key");
                false
            }
        }
    }

    /// Decode the JSON value stored under `key`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is not valid JSON for its type");
                None
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, &raw),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value");
                false
            }
        }
    }

    /// Delete `key`. Removing a missing key succeeds.
    pub fn remove(&self, key: &str) -> bool {
        let result = self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            Ok(())
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to remove key");
                false
            }
        }
    }

    /// Write several keys atomically: either every value lands or none does.
    pub(crate) fn write_all(&self, entries: &[(&str, String)]) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                     ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
                )?;
                for (key, value) in entries {
                    stmt.execute(rusqlite::params![key, value])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Delete several keys in one transaction.
    pub(crate) fn remove_all(&self, keys: &[&str]) -> bool {
        let result = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for key in keys {
                tx.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            }
            tx.commit()?;
            Ok(())
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to remove keys");
                false
            }
        }
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let result = self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        });
        result
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to list keys"))
            .unwrap_or_default()
    }
}
