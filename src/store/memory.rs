use super::LocalStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Volatile store backed by a HashMap. Used for local-only sessions in tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.inner.lock().await;
        let value = store.get(key).cloned();
        debug!(key, hit = value.is_some(), "Memory store GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut store = self.inner.lock().await;
        debug!(key, bytes = value.len(), "Memory store PUT");
        store.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_put() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("key1").await.unwrap().is_none());

        store.put("key1", b"abc").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"abc".to_vec()));

        // Overwrite
        store.put("key1", b"xyz").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"xyz".to_vec()));

        assert!(store.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.put("key1", b"123").await.unwrap();
        assert_eq!(other.get("key1").await.unwrap(), Some(b"123".to_vec()));
    }
}
