//! Cache layer with lifecycle-bound key membership.
//!
//! This module provides namespaced, identity-keyed cache collections whose
//! entries are tied to the lifetime of their key objects.
//!
//! # Design Philosophy
//!
//! Traditional caches own their keys, which quietly extends the lifetime of
//! anything used as a key. This module inverts that: the cache holds only
//! weak handles to key objects, so membership follows the key's own
//! reachability. Dropping the last external `Rc` to a key makes its entries
//! unobservable, with no explicit delete call.
//!
//! # Namespacing
//!
//! Entries live in named collections that never share state. A lookup in
//! collection `"ast"` cannot observe an entry set in `"scope"`, even for the
//! same key object. Collections are created lazily on first write; reads on
//! an unknown collection are pure no-ops.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use nscache::cache::NamespacedCache;
//!
//! let mut cache = NamespacedCache::new();
//! let node = Rc::new("node");
//!
//! cache.set("ast", &node, "metadata");
//! assert!(cache.has("ast", &node));
//! assert!(!cache.has("scope", &node));
//! ```

pub mod namespaced;
pub mod stats;
pub mod weak_store;

pub use namespaced::NamespacedCache;
pub use stats::CacheStats;
pub use weak_store::WeakKeyStore;
