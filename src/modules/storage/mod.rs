//! Key-value persistence for template overrides
//!
//! One namespaced key holds a whole JSON document. PostgreSQL backs it in
//! deployments; the in-memory store is used without a database and in tests.

mod kv_store;
mod memory_store;
mod postgres_store;

pub use kv_store::{KeyValueStore, StorageError};
pub use memory_store::InMemoryKeyValueStore;
pub use postgres_store::PostgresKeyValueStore;
