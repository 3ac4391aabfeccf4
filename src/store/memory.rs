use crate::core::store::KeyValueStore;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store, used when no data directory is available and in tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        map.insert(key.to_string(), value.to_vec());
        debug!("Store PUT for key: {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        map.remove(key);
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_get_put_remove() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", b"value").unwrap();
        assert_eq!(store.get("key1").unwrap(), Some(b"value".to_vec()));

        // Overwrite
        store.put("key1", b"other").unwrap();
        assert_eq!(store.get("key1").unwrap(), Some(b"other".to_vec()));

        store.remove("key1").unwrap();
        assert!(store.get("key1").unwrap().is_none());

        // Removing a missing key is not an error
        store.remove("key2").unwrap();
    }
}
