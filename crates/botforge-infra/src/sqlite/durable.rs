//! SQLite durable key store.
//!
//! Implements `DurableStore` from `botforge-core`: one row per key in
//! `durable_keys`, each write replacing the whole value.

use chrono::Utc;
use sqlx::Row;

use botforge_core::storage::durable::DurableStore;
use botforge_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DurableStore`.
#[derive(Clone)]
pub struct SqliteDurableStore {
    pool: DatabasePool,
}

impl SqliteDurableStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl DurableStore for SqliteDurableStore {
    async fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM durable_keys WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO durable_keys (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM durable_keys WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}
