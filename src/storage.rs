//! Client-side key/value storage.
//!
//! DESIGN
//! ======
//! Mirrors the browser `localStorage` surface the session needs: string keys,
//! string values. Writes are batched (`set_all`, `remove_all`) so a caller
//! updating several keys publishes them in one step and readers never see
//! half of a batch.
//!
//! `FileStorage` keeps every key in a single JSON object file and replaces it
//! with write-to-temp + rename.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Errors produced by persistent storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("refusing to store a session with an empty token")]
    EmptyToken,
}

/// String key/value storage with batched atomic writes.
pub trait Storage: Send + Sync {
    /// Read one value. Unreadable storage reads as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Set every pair in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the batch.
    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Remove every key in one atomic write. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process storage. Lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in entries {
            map.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

/// Storage backed by one JSON object file.
///
/// The in-process mutex serializes read-modify-write cycles; the rename keeps
/// the file itself consistent for other processes.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io { path: self.path.clone(), source }),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(map)?;
        std::fs::write(&tmp, bytes).map_err(io_error(&tmp))?;
        std::fs::rename(&tmp, &self.path).map_err(io_error(&self.path))
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        // A corrupt file is replaced rather than blocking every future write.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StorageError::Encode(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        apply(&mut map);
        self.write_map(&map)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage read failed");
                None
            }
        }
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_owned(), value.clone());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
