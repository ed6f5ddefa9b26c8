//! File-backed key/value medium
//!
//! Entries are kept as a single JSON object. Every read goes to disk so a new
//! process (or a second `FileStore` on the same path) observes the latest
//! write. Writes go to a uniquely named sibling temporary file which is then
//! renamed over the original, so readers never see a half-written document.
//! A file that is not valid JSON reads as an error, but the next write
//! replaces it with a fresh document.

use super::{KeyValueStore, StorageError};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Unique temp file in the target directory so concurrent writers never
        // share one, and the rename stays on the same filesystem
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Persisted {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries) -> bool) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut entries, recovered) = match self.load() {
            Ok(entries) => (entries, false),
            Err(StorageError::Format(e)) => {
                warn!(
                    "Discarding unreadable storage file {}: {e}",
                    self.path.display()
                );
                (Entries::new(), true)
            }
            Err(e) => return Err(e),
        };
        if apply(&mut entries) || recovered {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("storage.json"))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_value_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).set("shopease_token", "abc").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.get("shopease_token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.remove("a").unwrap();
        store.remove("a").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested/deeper/storage.json"));

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get("k"), Err(StorageError::Format(_))));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        store.set("shopease_token", "a.b.c").unwrap();

        assert_eq!(store.get("shopease_token").unwrap().as_deref(), Some("a.b.c"));
        assert_eq!(store_in(&dir).get("shopease_token").unwrap().as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_remove_resets_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        store.remove("shopease_token").unwrap();

        assert_eq!(store.get("shopease_token").unwrap(), None);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);
    }

    #[test]
    fn test_concurrent_writers_keep_valid_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::new(path);
                    for _ in 0..10 {
                        store.set("shopease_token", &format!("token-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = FileStore::new(&path).get("shopease_token").unwrap();
        assert!(value.is_some_and(|v| v.starts_with("token-")));
    }
}
