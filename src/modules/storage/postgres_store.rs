use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{KeyValueStore, StorageError};

/// Key-value store on the `kv_store` table (see `migrations/`)
pub struct PostgresKeyValueStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresKeyValueStore")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

impl PostgresKeyValueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PostgresKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let row: Option<(Json<serde_json::Value>,)> =
            sqlx::query_as("SELECT value FROM kv_store WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read key '{}': {:?}", key, e);
                    StorageError::Database(e)
                })?;

        Ok(row.map(|(Json(value),)| value))
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write key '{}': {:?}", key, e);
            StorageError::Database(e)
        })?;

        tracing::debug!("Persisted key '{}'", key);
        Ok(())
    }
}
