mod errors;
pub mod keys;
pub mod memory;
pub mod persister;
pub mod postgres;

pub use errors::StoreError;
pub use memory::InMemoryStore;
pub use persister::PersistenceHandle;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Asynchronous string key-value store holding JSON blobs.
///
/// Every write is a full overwrite of the value stored under `key`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and decodes the value under `key`.
///
/// Absent keys, backend failures and malformed JSON all yield `T::default()`;
/// the failure is logged and never surfaced to the caller.
pub async fn load_json_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Malformed stored value, using default");
                T::default()
            }
        },
        Ok(None) => {
            debug!(key, "No stored value, using default");
            T::default()
        }
        Err(err) => {
            warn!(key, error = %err, "Failed to read stored value, using default");
            T::default()
        }
    }
}

pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}
