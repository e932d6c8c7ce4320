use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior};
use tracing::debug;

use crate::database::DatabasePool;
use super::errors::RepositoryError;

/// Database storage operations over the `kv_store` table
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Read the value stored under `key`
    pub fn get(pool: &DatabasePool, key: &str) -> Result<Option<String>, RepositoryError> {
        debug!("Reading key from database: key={}", key);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let value = conn
                    .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
                    .optional()?;
                Ok(value)
            }
        }
    }

    /// Read-modify-write of a single key inside an IMMEDIATE transaction.
    ///
    /// The write lock is taken before the read, so two concurrent updates of
    /// the same key serialize instead of overwriting each other.
    pub fn update<T, F>(pool: &DatabasePool, key: &str, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(Option<String>) -> Result<(String, T), RepositoryError>,
    {
        debug!("Updating key in database: key={}", key);

        match pool {
            DatabasePool::SQLite(pool) => {
                let mut conn = pool.get()?;
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let current: Option<String> = tx
                    .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
                    .optional()?;

                // Dropping the transaction on error rolls it back
                let (value, result) = apply(current)?;

                tx.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    (key, &value, Utc::now().to_rfc3339()),
                )?;
                tx.commit()?;

                Ok(result)
            }
        }
    }
}
