use crate::error::{AppError, AppResult};
use crate::storage::blob::BlobStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Blob store keeping each key in its own JSON file under `dir`
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Create the store, making sure the data directory exists
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AppError::storage(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn write(&mut self, key: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(key);
        fs::write(&path, bytes).map_err(|e| AppError::storage(e.to_string()))?;
        Ok(())
    }

    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read(&path).map_err(|e| AppError::storage(e.to_string()))?;
        Ok(Some(content))
    }

    fn delete(&mut self, key: &str) -> AppResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| AppError::storage(e.to_string()))?;
        }
        Ok(())
    }
}
