//! Key-value stores backing the session.
//!
//! [`MemoryStore`] is for tests and embedding; [`FileStore`] persists to a
//! JSON file and writes through on every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

/// Errors raised by a persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read session file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String key-value storage with `get`/`set`/`remove`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove several keys. Persistent stores override this to write once.
    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Volatile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
#[derive(Debug)]
pub struct FileStore {
    inner: DashMap<String, String>,
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries. A missing file is
    /// an empty store; an unreadable JSON document is discarded with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            inner: DashMap::new(),
            path,
        };

        if store.path.exists() {
            let content = fs::read_to_string(&store.path).map_err(|source| StoreError::Read {
                path: store.path.clone(),
                source,
            })?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => {
                    for (k, v) in map {
                        store.inner.insert(k, v);
                    }
                    tracing::debug!(path = ?store.path, entries = store.inner.len(), "Loaded session file");
                }
                Err(e) => {
                    tracing::warn!(path = ?store.path, error = %e, "Discarding unreadable session file");
                }
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let map: BTreeMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let json = serde_json::to_vec_pretty(&map).map_err(|e| write_err(e.into()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        restrict_permissions(&tmp).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.inner.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut changed = false;
        for key in keys {
            changed |= self.inner.remove(*key).is_some();
        }
        if changed {
            self.save()?;
        }
        Ok(())
    }
}

// The file holds a bearer token.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert!(store.get("token").is_none());
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("abc"));
        store.clear(&["token", "user"]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set("token", "abc").unwrap();
        store.set("userRole", "coach").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("userRole").as_deref(), Some("coach"));

        reopened.clear(&["token"]).unwrap();
        let again = FileStore::open(&path).unwrap();
        assert!(again.get("token").is_none());
        assert_eq!(again.get("userRole").as_deref(), Some("coach"));
    }

    #[test]
    fn test_file_store_discards_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("token").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileStore::open(&path).unwrap().set("token", "abc").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
