//! Key-value storage backends.
//!
//! The recipe store and the preferences live in a handful of string slots
//! addressed by key. Anything that can `get`/`set`/`remove` a string by key
//! can back them, which keeps the store free of global state and lets tests
//! swap in an in-memory map.
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, error, trace};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::{RecipeError, Result};

/// Async key-value storage with string values
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is unset
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing an unset key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Backend that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Backend that stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                RecipeError::DirectoryError { path: dir.clone() }
            })?;
        }
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RecipeError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        trace!("Reading key '{}' from {}", key, path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(unavailable(&path, e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let value = value.to_string();
        tokio::task::spawn_blocking(move || write_atomically(&path, &value))
            .await
            .map_err(|e| RecipeError::StorageUnavailable {
                message: format!("Write task for key '{}' failed: {}", key, e),
            })?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(unavailable(&path, e))
            }
        }
    }
}

/// Writes into a temporary file next to `path`, then renames it over `path`
/// so readers never see a half-written value.
fn write_atomically(path: &Path, value: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    trace!("Creating temporary file in directory: {}", dir.display());
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
        error!("Failed to create temporary file: {}", e);
        unavailable(path, e)
    })?;

    temp_file.write_all(value.as_bytes()).map_err(|e| {
        error!("Failed to write to temporary file: {}", e);
        unavailable(path, e)
    })?;

    temp_file.flush().map_err(|e| {
        error!("Failed to flush temporary file: {}", e);
        unavailable(path, e)
    })?;

    temp_file.persist(path).map_err(|e| {
        error!("Failed to persist file {}: {}", path.display(), e.error);
        unavailable(path, e.error)
    })?;

    debug!("Wrote {} bytes to {}", value.len(), path.display());
    Ok(())
}

fn unavailable(path: &Path, e: std::io::Error) -> RecipeError {
    RecipeError::StorageUnavailable {
        message: format!("{}: {}", path.display(), e),
    }
}
