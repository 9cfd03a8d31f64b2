use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

use super::{KeyValueStore, StoreError};

/// PostgreSQL implementation of KeyValueStore
///
/// Values live in a single `kv_store` table keyed by the storage key.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await.map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            StoreError::Backend(e.to_string())
        })?;
        Ok(Self::new(pool))
    }

    /// Creates the backing table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_store (key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TIMESTAMPTZ NOT NULL)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create kv_store table");
            StoreError::Backend(e.to_string())
        })?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        debug!(key, "Fetching value from database");

        let row = sqlx::query("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, key, "Failed to fetch value from database");
                StoreError::Backend(e.to_string())
            })?;

        Ok(row.map(|row| row.get("value")))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "Writing value to database");

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(key)
        .bind(&value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, key, "Failed to write value to database");
            StoreError::Backend(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        debug!(key, "Deleting value from database");

        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, key, "Failed to delete value from database");
                StoreError::Backend(e.to_string())
            })?;

        Ok(())
    }
}
