use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{KeyValueStore, StoreError};

/// In-memory implementation of KeyValueStore for development and testing
///
/// Values are lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a store with pre-populated raw values
    pub fn with_entries<K, V>(entries: Vec<(K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        let value = entries.get(key).cloned();
        debug!(key, found = value.is_some(), "Read value from memory");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        debug!(key, bytes = value.len(), "Writing value to memory");
        entries.insert(key.to_string(), value);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = InMemoryStore::new();

        store.set("scout_Tigers", "{}".to_string()).await.unwrap();
        store
            .set("scout_Tigers", r#"{"1":{}}"#.to_string())
            .await
            .unwrap();

        let value = store.get("scout_Tigers").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"1":{}}"#));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_deletes_key() {
        let store = InMemoryStore::with_entries(vec![("live_Tigers", "{}")]);

        store.remove("live_Tigers").await.unwrap();

        assert!(store.get("live_Tigers").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        clone.set("lineup", "{}".to_string()).await.unwrap();

        assert!(store.contains_key("lineup").await);
    }
}
