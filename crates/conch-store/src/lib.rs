//! Key/value store abstraction for conch.
//!
//! The interpreter treats durable state (user aliases, cached values) as a
//! flat string-keyed map behind the [`KvStore`] trait. Persistence mechanics
//! are an implementation concern: [`MemoryStore`] keeps everything in memory
//! (tests, ephemeral sessions) while [`JsonStore`] flushes to a JSON file
//! after every mutation.

use std::collections::BTreeMap;

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// A mutable string-keyed, string-valued store.
///
/// Mutating methods never fail from the caller's point of view; an
/// implementation that persists externally logs flush problems and keeps the
/// in-memory state authoritative.
pub trait KvStore {
    /// Insert or overwrite a value.
    fn put(&mut self, key: &str, value: &str);

    /// Look up a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Remove a key. Returns `true` if the key existed.
    fn remove(&mut self, key: &str) -> bool;

    /// Snapshot of all entries, sorted by key.
    fn list(&self) -> BTreeMap<String, String>;

    /// Remove every entry.
    fn clear(&mut self);

    /// Whether a key is present.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    fn len(&self) -> usize {
        self.list().len()
    }

    /// Whether the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
