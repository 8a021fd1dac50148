//! Explicit memoization for recursive computations
//!
//! The memo store is passed down the call chain rather than hidden in a
//! global, so the same recurrence can run against a splay tree or a
//! bounded LRU.

use std::hash::Hash;
use seqstore::{Error, Result};

use crate::lru::LruCache;
use crate::splay::SplayTree;

/// Minimal lookup/store capability shared by the memo stores
///
/// Eviction and invalidation are store-specific and stay off this trait.
pub trait Memo<K, V> {
    /// Cached value for `key`, if any
    fn lookup(&mut self, key: &K) -> Option<V>;

    /// Remember `value` for `key`
    fn store(&mut self, key: K, value: V);
}

impl<K: Ord, V: Clone> Memo<K, V> for SplayTree<K, V> {
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.search(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K, V> Memo<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.put(key, value);
    }
}

/// Largest n whose Fibonacci number fits in a `u128`
pub const FIB_MAX_N: u64 = 186;

/// f(n) = f(n - 1) + f(n - 2) with f(0) = 0, f(1) = 1, memoized in `memo`
///
/// # Errors
/// * `Error::Overflow(n)` - f(n) does not fit in a `u128`
pub fn fibonacci_memo<M>(n: u64, memo: &mut M) -> Result<u128>
where
    M: Memo<u64, u128> + ?Sized,
{
    if let Some(value) = memo.lookup(&n) {
        return Ok(value);
    }

    if n < 2 {
        memo.store(n, u128::from(n));
        return Ok(u128::from(n));
    }

    let a = fibonacci_memo(n - 1, memo)?;
    let b = fibonacci_memo(n - 2, memo)?;
    let value = a.checked_add(b).ok_or(Error::Overflow(n))?;

    memo.store(n, value);
    Ok(value)
}

/// Iterative reference implementation
pub fn fibonacci_iter(n: u64) -> Result<u128> {
    if n == 0 {
        return Ok(0);
    }

    let (mut a, mut b) = (0u128, 1u128);
    for i in 2..=n {
        let next = a.checked_add(b).ok_or(Error::Overflow(i))?;
        a = b;
        b = next;
    }
    Ok(b)
}
