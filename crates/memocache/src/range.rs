//! Bounded recency cache over interval sums
//!
//! Exact-key cache: `[l, r]` and `[l, r + 1]` are unrelated entries. A write
//! at position `i` must be followed by [`RangeSumCache::invalidate`] so that
//! every interval covering `i` is dropped.

use seqstore::{Error, Result};
use tracing::debug;

use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Inclusive interval `[l, r]` with `l <= r`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeKey {
    l: usize,
    r: usize,
}

impl RangeKey {
    /// Build a key, rejecting `l > r`
    pub fn new(l: usize, r: usize) -> Result<Self> {
        if l > r {
            return Err(Error::InvalidRange { l, r });
        }
        Ok(Self { l, r })
    }

    fn checked(l: usize, r: usize) -> Self {
        assert!(l <= r, "invalid range key [{}, {}]", l, r);
        Self { l, r }
    }

    /// Left bound
    pub fn l(&self) -> usize {
        self.l
    }

    /// Right bound
    pub fn r(&self) -> usize {
        self.r
    }

    /// True when `l <= index <= r`
    pub fn covers(&self, index: usize) -> bool {
        self.l <= index && index <= self.r
    }
}

/// Capacity-bounded LRU cache of interval sums
///
/// # Panics
/// `get`, `put` and `contains` panic when `l > r`.
pub struct RangeSumCache {
    entries: LruCache<RangeKey, i64>,
    stats: CacheStats,
}

impl RangeSumCache {
    /// Create a cache holding at most `capacity` intervals
    ///
    /// Capacity 0 is valid and keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Look up `[l, r]`, marking it most recently used on a hit
    pub fn get(&mut self, l: usize, r: usize) -> Option<i64> {
        let key = RangeKey::checked(l, r);
        match self.entries.get(&key) {
            Some(&sum) => {
                self.stats.record_hit();
                Some(sum)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or refresh `[l, r]`, evicting the least recently used entry on overflow
    pub fn put(&mut self, l: usize, r: usize, value: i64) {
        let key = RangeKey::checked(l, r);
        self.stats.record_insert();

        if let Some((evicted, _)) = self.entries.put(key, value) {
            self.stats.record_eviction();
            debug!(l = evicted.l, r = evicted.r, "evicted range");
        }
    }

    /// Drop every interval covering `index`
    ///
    /// Intervals not covering `index` keep their recency. Returns the number removed.
    pub fn invalidate(&mut self, index: usize) -> usize {
        let removed = self.entries.retain(|key, _| !key.covers(index));

        if removed > 0 {
            self.stats.record_invalidations(removed as u64);
            debug!(index, removed, "invalidated ranges");
        }

        removed
    }

    /// Check whether `[l, r]` is cached, without touching recency
    pub fn contains(&self, l: usize, r: usize) -> bool {
        self.entries.contains(&RangeKey::checked(l, r))
    }

    /// Cached entries from most to least recently used
    pub fn entries(&self) -> Vec<(RangeKey, i64)> {
        self.entries
            .keys_lru_order()
            .into_iter()
            .filter_map(|key| self.entries.peek(&key).map(|&sum| (key, sum)))
            .collect()
    }

    /// Number of cached intervals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop all entries and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cache: &RangeSumCache) -> Vec<(usize, usize)> {
        cache.entries().iter().map(|(k, _)| (k.l(), k.r())).collect()
    }

    #[test]
    fn test_range_key() {
        let key = RangeKey::new(2, 5).unwrap();
        assert!(key.covers(2));
        assert!(key.covers(5));
        assert!(!key.covers(1));
        assert!(!key.covers(6));
        assert!(RangeKey::new(5, 2).is_err());
    }

    #[test]
    fn test_get_put() {
        let mut cache = RangeSumCache::new(4);

        assert_eq!(cache.get(0, 2), None);
        cache.put(0, 2, 16);
        assert_eq!(cache.get(0, 2), Some(16));

        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_eviction_scenario() {
        let mut cache = RangeSumCache::new(2);

        cache.put(0, 0, 1); // A
        cache.put(1, 1, 2); // B
        cache.put(2, 2, 3); // C

        assert!(!cache.contains(0, 0));
        assert_eq!(keys(&cache), vec![(2, 2), (1, 1)]);

        assert_eq!(cache.get(1, 1), Some(2));
        cache.put(3, 3, 4); // D

        assert!(!cache.contains(2, 2));
        assert_eq!(keys(&cache), vec![(3, 3), (1, 1)]);
        assert_eq!(cache.stats().evictions(), 2);
    }

    #[test]
    fn test_put_refreshes_existing() {
        let mut cache = RangeSumCache::new(2);

        cache.put(0, 1, 10);
        cache.put(2, 3, 20);
        cache.put(0, 1, 11); // refresh, no eviction
        cache.put(4, 5, 30); // evicts (2, 3)

        assert_eq!(cache.get(0, 1), Some(11));
        assert!(!cache.contains(2, 3));
        assert_eq!(cache.stats().snapshot().inserts, 4);
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache = RangeSumCache::new(0);

        cache.put(0, 3, 17);

        assert!(cache.is_empty());
        assert_eq!(cache.get(0, 3), None);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_invalidate() {
        let mut cache = RangeSumCache::new(10);

        cache.put(0, 2, 1);
        cache.put(2, 4, 2);
        cache.put(3, 5, 3);
        cache.put(6, 9, 4);

        assert_eq!(cache.invalidate(2), 2);
        assert_eq!(keys(&cache), vec![(6, 9), (3, 5)]);
        assert_eq!(cache.invalidate(100), 0);
        assert_eq!(cache.stats().invalidations(), 2);
    }

    #[test]
    fn test_invalidate_keeps_recency_of_survivors() {
        let mut cache = RangeSumCache::new(3);

        cache.put(0, 0, 1);
        cache.put(5, 5, 2);
        cache.put(9, 9, 3);
        cache.invalidate(5);
        cache.put(7, 7, 4);
        cache.put(8, 8, 5); // evicts (0, 0), the oldest survivor

        assert_eq!(keys(&cache), vec![(8, 8), (7, 7), (9, 9)]);
    }

    #[test]
    #[should_panic(expected = "invalid range key")]
    fn test_get_rejects_inverted_range() {
        let mut cache = RangeSumCache::new(1);
        cache.get(3, 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = RangeSumCache::new(3);

        cache.put(0, 1, 1);
        cache.get(0, 1);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.stats().hits(), 0);
    }
}
