//! Range cache counters
//!
//! Counters are atomics so a shared cache can be observed without taking
//! its lock. Readers take a [`StatsSnapshot`] instead of loading each
//! counter separately.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by [`RangeSumCache`](crate::RangeSumCache)
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// `get` calls that found their interval
    pub hits: u64,
    /// `get` calls that did not
    pub misses: u64,
    /// `put` calls, fresh or refreshing
    pub inserts: u64,
    /// Entries dropped to respect the capacity
    pub evictions: u64,
    /// Entries dropped because a covered position was written
    pub invalidations: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that hit, 0.0 before any lookup
    pub fn hit_ratio(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        bump(&self.hits, 1);
    }

    pub(crate) fn record_miss(&self) {
        bump(&self.misses, 1);
    }

    pub(crate) fn record_insert(&self) {
        bump(&self.inserts, 1);
    }

    pub(crate) fn record_eviction(&self) {
        bump(&self.evictions, 1);
    }

    pub(crate) fn record_invalidations(&self, count: u64) {
        bump(&self.invalidations, count);
    }

    /// Copy all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Total entries dropped by invalidation
    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Total capacity evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Hit ratio over all lookups so far
    pub fn hit_ratio(&self) -> f64 {
        self.snapshot().hit_ratio()
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.inserts,
            &self.evictions,
            &self.invalidations,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
