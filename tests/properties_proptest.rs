//! Property-based tests: every variant against a linear model, with a full
//! structural check after each mutation.

mod common;

use std::collections::BTreeSet;

use common::Model;
use common::Op;
use common::ops;
use common::scan_aggregate;
use ordex::Config;
use ordex::Interval;
use ordex::IntervalSet;
use ordex::OrderedSet;
use ordex::RangeAggregateMap;
use ordex::RankedList;
use ordex::Sweep;
use proptest::prelude::*;

// =============================================================================
// Ordered set
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Matches a BTreeSet under either sweep policy.
    #[test]
    fn ordered_set_matches_btreeset(
        script in ops(64, 200),
        seed in any::<u64>(),
        deferred in any::<bool>(),
    ) {
        let sweep = if deferred { Sweep::Deferred } else { Sweep::Eager };
        let mut set = OrderedSet::with_config(Config::new().with_sweep(sweep).with_seed(seed)).unwrap();
        let mut model = BTreeSet::new();

        for op in &script {
            match *op {
                Op::Insert(key) => {
                    prop_assert_eq!(set.insert(key), model.insert(key));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(set.delete(&key), model.remove(&key));
                }
            }
            prop_assert!(set.validate().is_ok(), "{:?}", set.validate());
        }

        prop_assert_eq!(set.len(), model.len());
        prop_assert!(set.iter().eq(model.iter()));
        for key in 0..64 {
            prop_assert_eq!(set.contains(&key), model.contains(&key));
        }
    }

    /// Deleting an absent key changes nothing.
    #[test]
    fn delete_is_idempotent(keys in prop::collection::vec(0..100i32, 0..60), victim in 0..100i32) {
        let mut set: OrderedSet<i32> = keys.iter().copied().collect();
        let first = set.delete(&victim);
        let before: Vec<i32> = set.iter().copied().collect();
        prop_assert!(!set.delete(&victim));
        prop_assert_eq!(set.iter().copied().collect::<Vec<_>>(), before);
        prop_assert_eq!(first, keys.contains(&victim));
        prop_assert!(set.validate().is_ok());
    }
}

// =============================================================================
// Ranked list
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rank and select agree with positions in a sorted vector.
    #[test]
    fn ranked_list_matches_sorted_vec(script in ops(40, 200), seed in any::<u64>()) {
        let mut list = RankedList::with_config(Config::new().with_seed(seed)).unwrap();
        let mut model: Model<()> = Model::default();

        for op in &script {
            match *op {
                Op::Insert(key) => {
                    list.insert(key);
                    model.insert(key, ());
                }
                Op::Delete(key) => {
                    prop_assert_eq!(list.delete(&key), model.delete(key));
                }
            }
            prop_assert!(list.validate().is_ok(), "{:?}", list.validate());
        }

        let keys = model.keys();
        prop_assert_eq!(list.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(list.select(i + 1).unwrap(), Some(key));
        }
        prop_assert_eq!(list.select(keys.len() + 1).unwrap(), None);
        for key in 0..40 {
            let expected = keys.iter().position(|k| *k == key).map(|i| i + 1);
            prop_assert_eq!(list.rank(&key), expected);
        }
    }

    /// `rank(select(k)) == k` whenever the key at `k` is unique.
    #[test]
    fn select_then_rank_round_trips(keys in prop::collection::btree_set(-500..500i32, 1..120)) {
        let list: RankedList<i32> = keys.iter().copied().collect();
        for k in 1..=keys.len() {
            let key = *list.select(k).unwrap().unwrap();
            prop_assert_eq!(list.rank(&key), Some(k));
        }
    }

    #[test]
    fn count_range_matches_filter(
        keys in prop::collection::vec(0..200i32, 0..100),
        lo in 0..200i32,
        width in 0..80i32,
    ) {
        let list: RankedList<i32> = keys.iter().copied().collect();
        let hi = lo + width;
        let expected = keys.iter().filter(|k| lo <= **k && **k <= hi).count();
        prop_assert_eq!(list.count_range(&lo, &hi).unwrap(), expected);
    }
}

// =============================================================================
// Range aggregate
// =============================================================================

fn valued_ops() -> impl Strategy<Value = Vec<(Op, i16)>> {
    let op = prop_oneof![
        3 => (0..50i32).prop_map(Op::Insert),
        2 => (0..50i32).prop_map(Op::Delete),
    ];
    return prop::collection::vec((op, any::<i16>()), 0..150);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Every window agrees with a linear scan, including after deletes that
    /// remove span minima and maxima.
    #[test]
    fn range_aggregate_matches_scan(script in valued_ops(), seed in any::<u64>()) {
        let mut map = RangeAggregateMap::with_config(Config::new().with_seed(seed)).unwrap();
        let mut model: Model<f64> = Model::default();

        for (op, value) in &script {
            match *op {
                Op::Insert(key) => {
                    map.insert(key, f64::from(*value)).unwrap();
                    model.insert(key, f64::from(*value));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(map.delete(&key), model.delete(key));
                }
            }
            prop_assert!(map.validate().is_ok(), "{:?}", map.validate());
        }

        for lo in (-2..52).step_by(3) {
            for hi in (lo..52).step_by(7) {
                let got = map.range_aggregate(&lo, &hi).unwrap();
                let want = scan_aggregate(&model.items, lo, hi);
                prop_assert!(got.approx_eq(&want), "[{}, {}]: {:?} vs {:?}", lo, hi, got, want);
            }
        }
    }
}

fn wide_ops() -> impl Strategy<Value = Vec<(Op, f64)>> {
    let op = prop_oneof![
        3 => (0..30i32).prop_map(Op::Insert),
        2 => (0..30i32).prop_map(Op::Delete),
    ];
    let value = prop_oneof![
        any::<i16>().prop_map(f64::from),
        prop::sample::select(vec![1e18, -1e18, 3e17, -3e17, 1e16]),
    ];
    return prop::collection::vec((op, value), 0..120);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Huge payloads mixed with small integers: small terms survive the
    /// cancellation of large ones, whatever the span shapes.
    #[test]
    fn wide_magnitude_sums_stay_exact(script in wide_ops(), seed in any::<u64>()) {
        let mut map = RangeAggregateMap::with_config(Config::new().with_seed(seed)).unwrap();
        let mut model: Model<f64> = Model::default();

        for (op, value) in &script {
            match *op {
                Op::Insert(key) => {
                    map.insert(key, *value).unwrap();
                    model.insert(key, *value);
                }
                Op::Delete(key) => {
                    prop_assert_eq!(map.delete(&key), model.delete(key));
                }
            }
            prop_assert!(map.validate().is_ok(), "{:?}", map.validate());
        }

        for lo in (-1..31).step_by(2) {
            for hi in (lo..31).step_by(5) {
                let got = map.range_aggregate(&lo, &hi).unwrap();
                let want = scan_aggregate(&model.items, lo, hi);
                prop_assert_eq!(got.sum(), want.sum(), "[{}, {}]", lo, hi);
                prop_assert!(got.approx_eq(&want), "[{}, {}]: {:?} vs {:?}", lo, hi, got, want);
            }
        }
    }
}

// =============================================================================
// Interval set
// =============================================================================

fn interval() -> impl Strategy<Value = Interval<i32>> {
    return (0..300i32, 0..40i32).prop_map(|(low, len)| Interval::new(low, low + len).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Overlap search finds something exactly when brute force does, and
    /// the full overlap list matches.
    #[test]
    fn overlap_matches_brute_force(
        items in prop::collection::vec(interval(), 0..80),
        removed in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        queries in prop::collection::vec(interval(), 1..20),
    ) {
        let mut set: IntervalSet<i32> = items.iter().copied().collect();
        let mut live = items.clone();
        for pick in &removed {
            if live.is_empty() {
                break;
            }
            let victim = live.remove(pick.index(live.len()));
            prop_assert!(set.delete(&victim));
            prop_assert!(set.validate().is_ok(), "{:?}", set.validate());
        }
        live.sort();

        for query in &queries {
            let expected: Vec<&Interval<i32>> = live.iter().filter(|iv| iv.overlaps(query)).collect();
            match set.overlap_search(query) {
                Some(hit) => {
                    prop_assert!(hit.overlaps(query));
                    prop_assert_eq!(Some(hit), expected.first().copied());
                }
                None => {
                    prop_assert!(expected.is_empty());
                }
            }
            prop_assert_eq!(set.overlapping(query), expected);
        }
    }
}
