use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored value under '{0}' could not be read; refusing to overwrite it")]
    Unread(String),
}

/// Durable key-value collaborator.
///
/// `get` returns `None` for an absent key; `put` replaces the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;
}
