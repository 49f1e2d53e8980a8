use crate::error::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Opaque key/value byte storage backing the reminder collection
pub trait BlobStore: Send {
    fn write(&mut self, key: &str, bytes: &[u8]) -> AppResult<()>;

    /// Returns `None` when nothing has been written under `key`
    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Removing a missing key is not an error
    fn delete(&mut self, key: &str) -> AppResult<()>;
}

/// In-memory blob store. Clones share the same underlying map, so a handle
/// kept by the caller sees everything written through another clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}

impl BlobStore for MemoryBlobStore {
    fn write(&mut self, key: &str, bytes: &[u8]) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::storage("Blob key cannot be empty"));
        }
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.lock().get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> AppResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
