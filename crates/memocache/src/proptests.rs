//! Property-based tests for the cache engines
//!
//! # Test Properties
//!
//! 1. **Capacity bound**: RangeSumCache never holds more than its capacity
//! 2. **Exact invalidation**: only intervals covering the written index are dropped
//! 3. **Freshness**: every cached sum matches the current sequence
//! 4. **Ordering**: splay tree keys stay strictly increasing in order
//! 5. **Round trip / idempotence**: insert-then-search and repeated search

#![cfg(test)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use seqstore::{Op, Sequence};

use crate::cached::CachedSequence;
use crate::range::RangeSumCache;
use crate::splay::SplayTree;

// =============================================================================
// Strategies
// =============================================================================

const SEQ_LEN: usize = 32;

/// Inclusive interval inside `0..SEQ_LEN`
fn range_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0..SEQ_LEN, 0..SEQ_LEN).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

/// Mixed read/write workload over a sequence of length `SEQ_LEN`
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        range_strategy().prop_map(|(l, r)| Op::Range { l, r }),
        (0..SEQ_LEN, 1i64..=100).prop_map(|(index, value)| Op::Update { index, value }),
    ]
}

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i32, i32),
    Search(i32),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        (-50i32..50, any::<i32>()).prop_map(|(k, v)| TreeOp::Insert(k, v)),
        (-60i32..60).prop_map(TreeOp::Search),
    ]
}

// =============================================================================
// RangeSumCache Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_capacity_bound(
        capacity in 0usize..8,
        puts in prop::collection::vec((range_strategy(), any::<i64>()), 0..64),
    ) {
        let mut cache = RangeSumCache::new(capacity);

        for ((l, r), value) in puts {
            cache.put(l, r, value);
            prop_assert!(cache.len() <= capacity);
        }
    }

    #[test]
    fn prop_invalidate_exact(
        puts in prop::collection::vec(range_strategy(), 0..40),
        index in 0..SEQ_LEN,
    ) {
        let mut cache = RangeSumCache::new(64);
        for (l, r) in &puts {
            cache.put(*l, *r, 0);
        }
        let before: Vec<_> = cache.entries().into_iter().map(|(k, _)| k).collect();

        let removed = cache.invalidate(index);
        let after: Vec<_> = cache.entries().into_iter().map(|(k, _)| k).collect();

        prop_assert!(after.iter().all(|k| !k.covers(index)));
        prop_assert_eq!(removed, before.iter().filter(|k| k.covers(index)).count());

        // Survivors keep their relative recency
        let expected: Vec<_> = before.into_iter().filter(|k| !k.covers(index)).collect();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn prop_cached_sums_stay_fresh(
        values in prop::collection::vec(1i64..=100, SEQ_LEN),
        capacity in 0usize..16,
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        let mut cached = CachedSequence::new(Sequence::new(values.clone()), capacity);
        let mut reference = Sequence::new(values);

        for op in ops {
            match op {
                Op::Range { l, r } => {
                    prop_assert_eq!(cached.range_sum(l, r).unwrap(), reference.range_sum(l, r).unwrap());
                }
                Op::Update { index, value } => {
                    cached.update(index, value).unwrap();
                    reference.write(index, value).unwrap();
                }
            }

            for (key, sum) in cached.cache().entries() {
                prop_assert_eq!(sum, reference.range_sum(key.l(), key.r()).unwrap());
            }
        }
    }
}

// =============================================================================
// SplayTree Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bst_order_and_contents(ops in prop::collection::vec(tree_op_strategy(), 0..200)) {
        let mut tree = SplayTree::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                TreeOp::Insert(k, v) => {
                    let added = tree.insert(k, v);
                    prop_assert_eq!(added, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                }
                TreeOp::Search(k) => {
                    prop_assert_eq!(tree.search(&k).copied(), model.get(&k).copied());
                }
            }

            let keys = tree.keys_in_order();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(keys.len(), model.len());
            prop_assert_eq!(tree.len(), model.len());
        }
    }

    #[test]
    fn prop_insert_then_search(
        keys in prop::collection::vec(-1000i64..1000, 0..100),
        key in -1000i64..1000,
        value in any::<i64>(),
    ) {
        let mut tree = SplayTree::new();
        for k in keys.iter().filter(|k| **k != key) {
            tree.insert(*k, 0);
        }

        tree.insert(key, value);
        prop_assert_eq!(tree.search(&key), Some(&value));
        prop_assert_eq!(tree.root_key(), Some(&key));
    }

    #[test]
    fn prop_search_idempotent(
        keys in prop::collection::vec(-100i64..100, 1..100),
        target in -120i64..120,
    ) {
        let mut tree = SplayTree::new();
        for k in &keys {
            tree.insert(*k, *k * 3);
        }

        let first = tree.search(&target).copied();
        let root = tree.root_key().copied();
        let rotations = tree.rotations();

        let second = tree.search(&target).copied();
        prop_assert_eq!(first, second);

        if first.is_some() {
            prop_assert_eq!(tree.rotations(), rotations);
            prop_assert_eq!(tree.root_key().copied(), root);
        }
    }
}
