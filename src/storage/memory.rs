use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{KeyValueStorage, StorageError};

/// In-memory key-value store.
///
/// Reads and writes can be switched to fail, which is how tests exercise the
/// persistence error paths.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` directly, bypassing failure injection.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        if let Ok(mut data) = self.data.write() {
            data.insert(key.into(), value.into());
        }
    }

    /// Reads `key` directly, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().ok()?.get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("read rejected".to_string()));
        }
        let data = self
            .data
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        let mut data = self
            .data
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        data.insert(key.to_string(), value);
        Ok(())
    }
}
