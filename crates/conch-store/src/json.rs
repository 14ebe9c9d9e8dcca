//! JSON file-backed store implementation.
//!
//! The whole store is one JSON object on disk. It is read once when the
//! store is opened and rewritten after every mutation, so the file is always
//! current even if the process dies without a clean shutdown. A missing or
//! unreadable file is not fatal: the store starts empty and logs a warning.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::KvStore;

/// A key/value store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonStore {
    /// Open a store backed by `path`, loading existing entries if the file
    /// exists. Corrupt or unreadable content is discarded with a warning;
    /// the in-memory map is authoritative from then on.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self { path, entries }
    }

    /// The file this store flushes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("ignoring corrupt store file {}: {e}", path.display());
                    BTreeMap::new()
                },
            },
            Err(e) => {
                log::warn!("could not read store file {}: {e}", path.display());
                BTreeMap::new()
            },
        }
    }

    fn flush(&self) {
        let text = match serde_json::to_string_pretty(&self.entries) {
            Ok(text) => text,
            Err(e) => {
                log::error!("could not serialize store: {e}");
                return;
            },
        };
        if let Err(e) = fs::write(&self.path, text) {
            log::error!("could not write store file {}: {e}", self.path.display());
        }
    }
}

impl KvStore for JsonStore {
    fn put(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.flush();
        }
        removed
    }

    fn list(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.flush();
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
