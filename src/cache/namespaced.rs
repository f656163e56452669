//! Namespaced cache over lazily-created weak-keyed stores.
//!
//! This module implements the top-level cache: a mapping from collection
//! name to an independent [`WeakKeyStore`], created the first time a value
//! is written to that name.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use fxhash::FxHashMap;

use super::stats::CacheStats;
use super::weak_store::WeakKeyStore;

/// A cache that manages multiple namespaced collections of per-object data.
///
/// Each collection is an independent [`WeakKeyStore`] identified by an opaque
/// string name. The set of names is open-ended: a collection is created
/// lazily the first time [`set`](NamespacedCache::set) is called with a new
/// name, and reads on an unknown name are pure no-ops.
///
/// Keys are object identities. The cache never keeps a key object alive;
/// once the last external `Rc` to a key is dropped, its entries read as
/// absent in every collection.
///
/// Collections never share entries: the same key object can carry
/// independent values in any number of collections, and a lookup in one
/// collection cannot observe a value set in another.
///
/// The value type is uniform per cache; consumers that need heterogeneous
/// values can instantiate with `V = Box<dyn Any>`.
///
/// This type is single-threaded by construction: `Rc` keys make it neither
/// `Send` nor `Sync`, so concurrent use requires external ownership
/// arrangements rather than internal locking.
pub struct NamespacedCache<K, V> {
    collections: FxHashMap<String, WeakKeyStore<K, V>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<K, V> NamespacedCache<K, V> {
    /// Create an empty cache with no collections.
    pub fn new() -> Self {
        Self {
            collections: FxHashMap::default(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Set a value for `key` in the named collection.
    ///
    /// Creates the collection if this is the first write to `collection`.
    /// A repeated `set` with the same key object overwrites the previous
    /// value.
    pub fn set(&mut self, collection: &str, key: &Rc<K>, value: V) {
        match self.collections.get_mut(collection) {
            Some(store) => {
                store.insert(key, value);
            }
            None => {
                let mut store = WeakKeyStore::new();
                store.insert(key, value);
                self.collections.insert(collection.to_owned(), store);
            }
        }
    }

    /// Get the value stored for `key` in the named collection.
    ///
    /// Returns `None` if the collection has never been written to, the key
    /// was never set, or the key object has since been dropped. A miss never
    /// creates the collection.
    pub fn get(&self, collection: &str, key: &Rc<K>) -> Option<&V> {
        let value = self
            .collections
            .get(collection)
            .and_then(|store| store.get(key));
        match value {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        value
    }

    /// Whether `key` currently resolves to a value in the named collection.
    ///
    /// Follows the same rules as [`get`](NamespacedCache::get): false for
    /// unknown collections, unset keys, and dropped key objects. Never
    /// creates the collection.
    pub fn has(&self, collection: &str, key: &Rc<K>) -> bool {
        let present = self
            .collections
            .get(collection)
            .is_some_and(|store| store.contains(key));
        if present {
            self.hits.set(self.hits.get() + 1);
        } else {
            self.misses.set(self.misses.get() + 1);
        }
        present
    }

    /// Sweep every collection, reclaiming entries whose keys were dropped.
    ///
    /// Returns how many entries were reclaimed across all collections.
    pub fn sweep(&mut self) -> usize {
        self.collections
            .values_mut()
            .map(WeakKeyStore::sweep)
            .sum()
    }

    /// Point-in-time statistics for this cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entry_count: self.collections.values().map(|s| s.len() as u64).sum(),
            collection_count: self.collections.len() as u64,
            swept: self.collections.values().map(WeakKeyStore::swept).sum(),
        }
    }
}

impl<K, V> Default for NamespacedCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for NamespacedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedCache")
            .field("collections", &self.collections.len())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = "collection name";

    #[test]
    fn test_set_creates_collection_lazily() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");

        assert_eq!(cache.stats().collection_count, 0);
        cache.set(COLLECTION, &key, "value");
        assert_eq!(cache.stats().collection_count, 1);
        assert_eq!(cache.get(COLLECTION, &key), Some(&"value"));
    }

    #[test]
    fn test_set_into_existing_collection() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");
        let key2 = Rc::new("key2");

        cache.set(COLLECTION, &key, "value");
        cache.set(COLLECTION, &key2, "value2");

        assert_eq!(cache.stats().collection_count, 1);
        assert_eq!(cache.get(COLLECTION, &key2), Some(&"value2"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");

        cache.set(COLLECTION, &key, 1);
        cache.set(COLLECTION, &key, 2);

        assert_eq!(cache.get(COLLECTION, &key), Some(&2));
        assert_eq!(cache.stats().entry_count, 1);
    }

    #[test]
    fn test_get_unknown_collection_returns_none() {
        let cache: NamespacedCache<&str, &str> = NamespacedCache::new();
        let key = Rc::new("key");

        assert_eq!(cache.get(COLLECTION, &key), None);
    }

    #[test]
    fn test_read_miss_does_not_create_collection() {
        let cache: NamespacedCache<&str, &str> = NamespacedCache::new();
        let key = Rc::new("key");

        assert_eq!(cache.get(COLLECTION, &key), None);
        assert!(!cache.has(COLLECTION, &key));

        let stats = cache.stats();
        assert_eq!(stats.collection_count, 0);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn test_has() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");
        let key2 = Rc::new("key2");

        cache.set(COLLECTION, &key, "value");

        assert!(cache.has(COLLECTION, &key));
        assert!(!cache.has(COLLECTION, &key2));
        assert!(!cache.has("other collection", &key));
    }

    #[test]
    fn test_collections_are_isolated() {
        let mut cache = NamespacedCache::new();
        let node = Rc::new("node");

        cache.set("ast", &node, 1);
        cache.set("scope", &node, 2);

        assert_eq!(cache.get("ast", &node), Some(&1));
        assert_eq!(cache.get("scope", &node), Some(&2));
        assert!(!cache.has("types", &node));
    }

    #[test]
    fn test_multiple_keys_in_collection() {
        let mut cache = NamespacedCache::new();
        let node_a = Rc::new("a");
        let node_b = Rc::new("b");
        let node_c = Rc::new("c");

        cache.set("ast", &node_a, "x");
        cache.set("ast", &node_b, "y");

        assert!(cache.has("ast", &node_a));
        assert!(cache.has("ast", &node_b));
        assert!(!cache.has("ast", &node_c));
    }

    #[test]
    fn test_dropped_key_disappears_everywhere() {
        let mut cache = NamespacedCache::new();
        let node = Rc::new("node");

        cache.set("ast", &node, 1);
        cache.set("scope", &node, 2);
        assert_eq!(cache.stats().entry_count, 2);

        drop(node);

        assert_eq!(cache.stats().entry_count, 0);
        assert_eq!(cache.sweep(), 2);
        assert_eq!(cache.stats().swept, 2);
    }

    #[test]
    fn test_cache_does_not_keep_key_alive() {
        let mut cache = NamespacedCache::new();
        let node = Rc::new("node");

        cache.set("ast", &node, 1);
        cache.set("scope", &node, 2);

        assert_eq!(Rc::strong_count(&node), 1);
    }

    #[test]
    fn test_hit_miss_counters() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");

        cache.set(COLLECTION, &key, "value");

        cache.get(COLLECTION, &key);
        cache.has(COLLECTION, &key);
        cache.get("unknown", &key);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_zero_sized_values() {
        let mut cache = NamespacedCache::new();
        let key = Rc::new("key");

        cache.set(COLLECTION, &key, ());

        assert_eq!(cache.get(COLLECTION, &key), Some(&()));
        assert!(cache.has(COLLECTION, &key));
    }

    #[test]
    fn test_heterogeneous_values_via_any() {
        use std::any::Any;

        let mut cache: NamespacedCache<&str, Box<dyn Any>> = NamespacedCache::new();
        let node = Rc::new("node");

        cache.set("ast", &node, Box::new(1u32));
        cache.set("scope", &node, Box::new("depth"));

        let ast = cache.get("ast", &node).and_then(|v| v.downcast_ref::<u32>());
        assert_eq!(ast, Some(&1));
        let scope = cache
            .get("scope", &node)
            .and_then(|v| v.downcast_ref::<&str>());
        assert_eq!(scope, Some(&"depth"));
    }
}
