//! Point-in-time cache statistics.

/// Statistics about cache usage, as returned by
/// [`NamespacedCache::stats`](super::NamespacedCache::stats).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of reads (`get` or `has`) that found a live entry.
    pub hits: u64,
    /// Number of reads that found nothing.
    pub misses: u64,
    /// Number of live entries across all collections at snapshot time.
    pub entry_count: u64,
    /// Number of collections created so far.
    pub collection_count: u64,
    /// Total dead entries reclaimed by sweeps over the cache's lifetime.
    pub swept: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
