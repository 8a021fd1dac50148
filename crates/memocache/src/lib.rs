//! # memocache
//!
//! Cache engines for repeated computation.
//!
//! ## Architecture
//! - **RangeSumCache**: bounded LRU of interval sums (AHash index + linked list),
//!   with invalidation of every interval covering a written position
//! - **CachedSequence**: RangeSumCache wrapping a `seqstore::Sequence`
//! - **SplayTree**: unbounded self-adjusting BST used as a memo store
//! - **Memo**: lookup/store capability driving explicit memoization

#![warn(missing_docs)]

mod cached;
mod lru;
mod memo;
mod range;
mod splay;
mod stats;

#[cfg(test)]
mod proptests;

pub use cached::{CachedSequence, SharedCachedSequence};
pub use lru::LruCache;
pub use memo::{fibonacci_iter, fibonacci_memo, Memo, FIB_MAX_N};
pub use range::{RangeKey, RangeSumCache};
pub use splay::SplayTree;
pub use stats::{CacheStats, StatsSnapshot};
