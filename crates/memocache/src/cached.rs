//! CachedSequence: RangeSumCache wrapping a Sequence

use std::sync::Arc;
use parking_lot::Mutex;
use seqstore::{Op, Result, Sequence};

use crate::range::RangeSumCache;
use crate::stats::CacheStats;

/// Sequence with cached interval sums and write-through invalidation
pub struct CachedSequence {
    /// Backing storage
    sequence: Sequence,

    /// LRU cache of interval sums
    cache: RangeSumCache,
}

impl CachedSequence {
    /// Wrap `sequence` with a cache of the given capacity
    pub fn new(sequence: Sequence, capacity: usize) -> Self {
        Self {
            sequence,
            cache: RangeSumCache::new(capacity),
        }
    }

    /// Sum over `[l, r]`, served from cache when possible
    ///
    /// # Returns
    /// * `Result<i64>` - the sum, or a bounds/interval error before the cache is touched
    pub fn range_sum(&mut self, l: usize, r: usize) -> Result<i64> {
        self.sequence.check_range(l, r)?;

        if let Some(sum) = self.cache.get(l, r) {
            return Ok(sum);
        }

        let sum = self.sequence.range_sum(l, r)?;
        self.cache.put(l, r, sum);
        Ok(sum)
    }

    /// Write `value` at `index` and drop every cached interval covering it
    pub fn update(&mut self, index: usize, value: i64) -> Result<()> {
        self.sequence.write(index, value)?;
        self.cache.invalidate(index);
        Ok(())
    }

    /// Apply a harness operation, returning the sum for `Range`
    pub fn apply(&mut self, op: Op) -> Result<Option<i64>> {
        match op {
            Op::Range { l, r } => self.range_sum(l, r).map(Some),
            Op::Update { index, value } => self.update(index, value).map(|()| None),
        }
    }

    /// Backing sequence
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Range cache
    pub fn cache(&self) -> &RangeSumCache {
        &self.cache
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Release the backing sequence, dropping the cache
    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }
}

/// Thread-shareable handle; each call holds the lock for its duration
#[derive(Clone)]
pub struct SharedCachedSequence {
    inner: Arc<Mutex<CachedSequence>>,
}

impl SharedCachedSequence {
    /// Wrap `sequence` with a cache of the given capacity
    pub fn new(sequence: Sequence, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CachedSequence::new(sequence, capacity))),
        }
    }

    /// See [`CachedSequence::range_sum`]
    pub fn range_sum(&self, l: usize, r: usize) -> Result<i64> {
        self.inner.lock().range_sum(l, r)
    }

    /// See [`CachedSequence::update`]
    pub fn update(&self, index: usize, value: i64) -> Result<()> {
        self.inner.lock().update(index, value)
    }

    /// Run `f` with exclusive access across several calls
    pub fn with<T>(&self, f: impl FnOnce(&mut CachedSequence) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Get current cache size
    pub fn cache_len(&self) -> usize {
        self.inner.lock().cache().len()
    }
}
