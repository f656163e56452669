//! nscache - Namespaced Weak-Keyed Cache Collections
//!
//! A cache that manages multiple named collections of per-object auxiliary
//! data. Keys are object identities (`Rc` allocations), not values, and the
//! cache holds its keys weakly: an entry never keeps its key object alive,
//! and once the key is dropped everywhere else the entry reads as absent.
//!
//! Collections are created lazily on first write and are fully isolated from
//! each other; the same key object can carry independent data in any number
//! of collections.
//!
//! ```
//! use std::rc::Rc;
//! use nscache::NamespacedCache;
//!
//! struct Node;
//!
//! let mut cache: NamespacedCache<Node, u32> = NamespacedCache::new();
//! let node = Rc::new(Node);
//!
//! cache.set("ast", &node, 1);
//! cache.set("scope", &node, 2);
//!
//! assert_eq!(cache.get("ast", &node), Some(&1));
//! assert_eq!(cache.get("scope", &node), Some(&2));
//! assert!(!cache.has("types", &node));
//! ```

pub mod cache;

// Re-export cache types for flat access
pub use cache::{CacheStats, NamespacedCache, WeakKeyStore};
