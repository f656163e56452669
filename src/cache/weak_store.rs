//! Identity-keyed store that does not retain its keys.
//!
//! This module implements the per-collection store: an associative map from
//! live `Rc` keys to values, where the store itself never keeps a key alive.

use std::fmt;
use std::rc::{Rc, Weak};

use fxhash::FxHashMap;

/// Map size below which inserts never trigger an automatic sweep.
const MIN_SWEEP_THRESHOLD: usize = 64;

/// A single slot: a weak handle to the key plus the stored value.
struct Entry<K, V> {
    key: Weak<K>,
    value: V,
}

/// An associative store keyed by `Rc` identity that does not retain its keys.
///
/// Keys are compared by allocation address, never by value: two structurally
/// equal `Rc` allocations are distinct keys. The store holds only [`Weak`]
/// handles, so an entry cannot keep its key object alive.
///
/// # Liveness
///
/// Every read checks the key's liveness, so an entry whose key has been
/// dropped everywhere else reads as absent immediately. The backing memory
/// for dead entries is reclaimed by [`sweep`](WeakKeyStore::sweep), which
/// [`insert`](WeakKeyStore::insert) also runs automatically once the map has
/// grown past its sweep threshold. Unattended stores therefore do not
/// accumulate dead entries without bound.
///
/// # Address stability
///
/// Address keys cannot alias across key lifetimes: an `Rc` allocation is only
/// freed once both its strong and weak counts reach zero, so an address held
/// in this map stays pinned until the entry itself is swept.
pub struct WeakKeyStore<K, V> {
    entries: FxHashMap<usize, Entry<K, V>>,
    /// Map size at which the next automatic sweep runs.
    sweep_threshold: usize,
    /// Total dead entries reclaimed over this store's lifetime.
    swept: u64,
}

impl<K, V> WeakKeyStore<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            sweep_threshold: MIN_SWEEP_THRESHOLD,
            swept: 0,
        }
    }

    /// Create an empty store with room for `n` entries before allocation.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(n, fxhash::FxBuildHasher::default()),
            sweep_threshold: MIN_SWEEP_THRESHOLD.max(n),
            swept: 0,
        }
    }

    /// Insert or overwrite the value for `key`.
    ///
    /// Returns the value previously stored under the same key object, if any.
    /// The store records only a weak handle to `key`; the caller's `Rc`
    /// remains the sole owner.
    pub fn insert(&mut self, key: &Rc<K>, value: V) -> Option<V> {
        if self.entries.len() >= self.sweep_threshold {
            self.sweep();
            self.sweep_threshold = MIN_SWEEP_THRESHOLD.max(self.entries.len() * 2);
        }

        let entry = Entry {
            key: Rc::downgrade(key),
            value,
        };
        self.entries
            .insert(Rc::as_ptr(key) as usize, entry)
            .map(|prev| prev.value)
    }

    /// Get the value stored for `key`, if present and not overwritten.
    pub fn get(&self, key: &Rc<K>) -> Option<&V> {
        let entry = self.entries.get(&(Rc::as_ptr(key) as usize))?;
        // Same address plus a live handle means the same allocation.
        if entry.key.upgrade().is_some() {
            Some(&entry.value)
        } else {
            None
        }
    }

    /// Whether `key` currently resolves to a stored value.
    pub fn contains(&self, key: &Rc<K>) -> bool {
        self.get(key).is_some()
    }

    /// Remove entries whose keys have been dropped.
    ///
    /// Returns how many entries were reclaimed.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.key.upgrade().is_some());
        let removed = before - self.entries.len();
        self.swept += removed as u64;
        removed
    }

    /// Number of live entries.
    ///
    /// Dead-but-unswept entries are not counted, so this walks the map.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.key.upgrade().is_some())
            .count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total dead entries reclaimed over this store's lifetime.
    pub fn swept(&self) -> u64 {
        self.swept
    }
}

impl<K, V> Default for WeakKeyStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for WeakKeyStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakKeyStore")
            .field("entries", &self.entries.len())
            .field("swept", &self.swept)
            .finish()
    }
}
