//! Key-value storage backends
//!
//! Mirrors the browser `localStorage` surface (`getItem`, `setItem`,
//! `removeItem`) so history and metrics can be persisted anywhere.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use telescope_core::StorageError;
use tracing::debug;

/// Synchronous key-value persistence
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting an absent key succeeds
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether no key is stored
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// Directory-backed storage, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage under the platform configuration directory
    pub fn default_location() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(config_dir.join("telescope"))
    }

    /// Directory holding the stored files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };

        std::fs::create_dir_all(&self.root).map_err(write_failed)?;
        std::fs::write(self.path_for(key), value).map_err(write_failed)?;
        debug!("Stored {} bytes under {:?}", value.len(), key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
