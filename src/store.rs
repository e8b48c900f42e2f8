//! Key-namespaced local record store.
//!
//! Every collection is one JSON array persisted under a `<collection>_<user>`
//! key. Reads load the whole collection; writes replace it. The backing
//! key-value `Storage` is injected so tests can substitute an in-memory fake.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// String key-value storage. Keys name whole collections; values hold the
/// serialized JSON array for one `(collection, user)` pair.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed storage: one `<key>.json` file per key inside the data
/// directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| Error::Persistence {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(|source| Error::Persistence {
                key: key.to_string(),
                source,
            })?;
        Ok(Some(buf))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|source| Error::Persistence {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Persistence {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory storage for tests. Writes can be switched off to simulate a
/// failing backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence {
                key: key.to_string(),
                source: std::io::Error::other("writes disabled"),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence {
                key: key.to_string(),
                source: std::io::Error::other("writes disabled"),
            });
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Sanitize a user id for use in storage keys and file names.
/// Lowercases and collapses runs of non-alphanumeric characters to `_`.
pub fn sanitize_user_id(user: &str) -> String {
    user.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn collection_key(collection: &str, user: &str) -> String {
    format!("{}_{}", collection, sanitize_user_id(user))
}

/// Typed collections layered over a `Storage`.
pub struct RecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        RecordStore { storage }
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Load a whole collection. A missing key is the empty collection;
    /// unparseable stored data is a hard error, not silent data loss.
    pub fn load<T: DeserializeOwned>(&self, collection: &str, user: &str) -> Result<Vec<T>> {
        let key = collection_key(collection, user);
        match self.storage.get(&key)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                warn!(%key, error = %source, "stored collection failed to parse");
                Error::MalformedData { key, source }
            }),
        }
    }

    /// Replace a whole collection.
    pub fn save<T: Serialize>(&mut self, collection: &str, user: &str, records: &[T]) -> Result<()> {
        let key = collection_key(collection, user);
        let raw =
            serde_json::to_string_pretty(records).map_err(|source| Error::Persistence {
                key: key.clone(),
                source: std::io::Error::other(source),
            })?;
        self.storage.set(&key, &raw)?;
        debug!(%key, count = records.len(), "collection saved");
        Ok(())
    }

    pub fn clear(&mut self, collection: &str, user: &str) -> Result<()> {
        self.storage.remove(&collection_key(collection, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_collection_loads_empty() {
        let store = RecordStore::new(MemoryStorage::new());
        let loaded: Vec<u32> = store.load("tasks", "u1").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = RecordStore::new(MemoryStorage::new());
        store.save("tasks", "u1", &[1u32, 2, 3]).unwrap();
        let loaded: Vec<u32> = store.load("tasks", "u1").unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn collections_are_user_scoped() {
        let mut store = RecordStore::new(MemoryStorage::new());
        store.save("tasks", "u1", &[1u32]).unwrap();
        store.save("tasks", "u2", &[2u32]).unwrap();
        let u1: Vec<u32> = store.load("tasks", "u1").unwrap();
        let u2: Vec<u32> = store.load("tasks", "u2").unwrap();
        assert_eq!(u1, vec![1]);
        assert_eq!(u2, vec![2]);
    }

    #[test]
    fn malformed_data_is_surfaced() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw("tasks_u1", "{not json");
        let store = RecordStore::new(storage);
        let err = store.load::<u32>("tasks", "u1").unwrap_err();
        assert!(matches!(err, Error::MalformedData { .. }));
    }

    #[test]
    fn write_failure_is_persistence_error() {
        let mut store = RecordStore::new(MemoryStorage::new());
        store.storage_mut().fail_writes(true);
        let err = store.save("tasks", "u1", &[1u32]).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn sanitize_user_id_collapses_specials() {
        assert_eq!(sanitize_user_id("Alice Smith"), "alice_smith");
        assert_eq!(sanitize_user_id("a!!b--c"), "a_b_c");
        assert_eq!(collection_key("tasks", "U1"), "tasks_u1");
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();
        assert_eq!(storage.get("tasks_u1").unwrap(), None);
        storage.set("tasks_u1", "[1,2]").unwrap();
        assert_eq!(storage.get("tasks_u1").unwrap().as_deref(), Some("[1,2]"));
        storage.remove("tasks_u1").unwrap();
        assert_eq!(storage.get("tasks_u1").unwrap(), None);
        // Removing an absent key is a no-op.
        storage.remove("tasks_u1").unwrap();
    }
}
