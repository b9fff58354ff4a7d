//! Range aggregation over `f64` payloads.
//!
//! The walk looks for the highest index node whose key falls inside
//! `[lo, hi]`. That node splits the range in two: a suffix ending at the
//! node, gathered by descending its left span and keeping only what is at
//! or after `lo`, and a prefix after the node, gathered by moving right
//! while whole spans stay at or below `hi`. Both halves add whole spans
//! where they can and touch the base chain only at the bottom.
//!
//! ```text
//!           x ---------------------------> r          level L
//!           |                              |
//!           x' ---> a ---> f ---> b -----> r'         level L-1
//!                          ^
//!                   first key >= lo: spans of b and r' are whole
//! ```

use std::cmp::Ordering;

use crate::augment::RangeAggregate;
use crate::augment::SpanAggregate;
use crate::engine::SkipIndex;
use crate::engine::arena::Idx;
use crate::engine::arena::NULL;
use crate::error::IndexError;
use crate::error::IndexResult;

impl<K> SkipIndex<K, f64, SpanAggregate> {
    /// Count, sum, min and max of the payloads with keys in `[lo, hi]`.
    pub fn range_aggregate(&self, lo: &K, hi: &K) -> IndexResult<RangeAggregate> {
        if self.compare(lo, hi) == Ordering::Greater {
            return Err(IndexError::InvalidRange);
        }

        let head = self.head();
        let mut x = head.node;
        let mut level = head.level;
        loop {
            let r = self.live_right(x);
            if r != NULL {
                let key = self.key(self.node(r).entry);
                if self.compare(key, lo) == Ordering::Less {
                    x = r;
                    continue;
                }
                if self.compare(key, hi) != Ordering::Greater {
                    let suffix = self.suffix_from(x, r, level, lo);
                    let prefix = self.prefix_after(r, level, hi);
                    return Ok(suffix.merge(&prefix));
                }
            }

            if level == 1 {
                return Ok(self.scan_base(self.node(x).entry, NULL, lo, hi));
            }
            x = self.node(x).down;
            level -= 1;
        }
    }

    /// Aggregate of the entries in the span `(x, end]` at `level` whose
    /// keys are at least `lo`. The entry of `end` is known to be in range.
    fn suffix_from(&self, mut x: Idx, mut end: Idx, mut level: usize, lo: &K) -> RangeAggregate {
        let mut acc = RangeAggregate::EMPTY;
        loop {
            let span = &self.node(end).value;
            if span.count == 1 {
                return acc.merge(span);
            }
            if level == 1 {
                let last = self.node(end).entry;
                let tail = self.scan_base(self.node(x).entry, last, lo, self.key(last));
                return acc.merge(&tail);
            }

            x = self.node(x).down;
            end = self.node(end).down;
            level -= 1;

            let mut first = self.live_right(x);
            while first != end && self.compare(self.key(self.node(first).entry), lo) == Ordering::Less {
                x = first;
                first = self.live_right(x);
            }

            // Spans after `first` up to `end` lie wholly inside the range.
            let mut n = first;
            while n != end {
                n = self.live_right(n);
                acc = acc.merge(&self.node(n).value);
            }
            end = first;
        }
    }

    /// Aggregate of the entries after `x` at `level` with keys at most
    /// `hi`.
    fn prefix_after(&self, mut x: Idx, mut level: usize, hi: &K) -> RangeAggregate {
        let mut acc = RangeAggregate::EMPTY;
        loop {
            loop {
                let r = self.live_right(x);
                if r == NULL || self.compare(self.key(self.node(r).entry), hi) == Ordering::Greater {
                    break;
                }
                acc = acc.merge(&self.node(r).value);
                x = r;
            }
            if level == 1 {
                let mut e = self.live_next(self.node(x).entry);
                while e != NULL && self.compare(self.key(e), hi) != Ordering::Greater {
                    if let Some((_, payload)) = self.item(e) {
                        acc = acc.merge(&RangeAggregate::single(*payload));
                    }
                    e = self.live_next(e);
                }
                return acc;
            }
            x = self.node(x).down;
            level -= 1;
        }
    }

    /// Base-chain scan after entry `from` over keys in `[lo, hi]`, ending
    /// early after entry `last` unless it is `NULL`.
    fn scan_base(&self, from: Idx, last: Idx, lo: &K, hi: &K) -> RangeAggregate {
        let mut acc = RangeAggregate::EMPTY;
        let mut e = self.live_next(from);
        while e != NULL {
            let Some((key, payload)) = self.item(e) else {
                break;
            };
            if self.compare(key, hi) == Ordering::Greater {
                break;
            }
            if self.compare(key, lo) != Ordering::Less {
                acc = acc.merge(&RangeAggregate::single(*payload));
            }
            if e == last {
                break;
            }
            e = self.live_next(e);
        }
        return acc;
    }
}

#[cfg(test)]
mod tests {
    use crate::augment::RangeAggregate;
    use crate::augment::SpanAggregate;
    use crate::config::Config;
    use crate::config::Duplicates;
    use crate::engine::SkipIndex;
    use crate::error::IndexError;
    use crate::level::ReplayBits;

    fn aggregated(levels: &[usize], items: &[(i32, f64)]) -> SkipIndex<i32, f64, SpanAggregate> {
        let rng = ReplayBits::from_levels(levels);
        let mut index: SkipIndex<i32, f64, SpanAggregate> =
            SkipIndex::with_rng(i32::cmp, Duplicates::Stack, Config::new(), rng).unwrap();
        for &(key, value) in items {
            index.insert(key, value).unwrap();
        }
        return index;
    }

    fn brute(items: &[(i32, f64)], lo: i32, hi: i32) -> RangeAggregate {
        let mut acc = RangeAggregate::EMPTY;
        for &(key, value) in items {
            if lo <= key && key <= hi {
                acc = acc.merge(&RangeAggregate::single(value));
            }
        }
        return acc;
    }

    #[test]
    fn equal_values_count_and_delete() {
        let keys = [60, 20, 10, 40, 30, 50, 70, 80];
        let items: Vec<(i32, f64)> = keys.iter().map(|&k| (k, 1.0)).collect();
        let mut index = aggregated(&[2, 0, 1, 3, 0, 1], &items);
        assert_eq!(index.range_aggregate(&0, &100).unwrap().count, 8);
        assert!(index.delete(&80));
        assert_eq!(index.range_aggregate(&0, &100).unwrap().count, 7);
        assert_eq!(index.select(1).unwrap(), Some((&10, &1.0)));
        assert_eq!(index.rank(&50), Some(5));
    }

    #[test]
    fn matches_scan_on_every_window() {
        let items: Vec<(i32, f64)> = (0..40).map(|k| (k * 3, ((k * 7) % 11) as f64 - 5.0)).collect();
        let index = aggregated(&[0, 1, 0, 0, 2, 1, 0, 3, 0, 1, 4], &items);
        for lo in (-3..125).step_by(4) {
            for hi in (lo..125).step_by(5) {
                let got = index.range_aggregate(&lo, &hi).unwrap();
                let want = brute(&items, lo, hi);
                assert!(got.approx_eq(&want), "[{lo}, {hi}]: {got:?} vs {want:?}");
            }
        }
    }

    #[test]
    fn empty_window_is_empty() {
        let index = aggregated(&[1, 2], &[(10, 4.0), (20, 6.0)]);
        let got = index.range_aggregate(&11, &19).unwrap();
        assert!(got.is_empty());
        assert_eq!(got.min, f64::INFINITY);
        assert_eq!(got.max, f64::NEG_INFINITY);
    }

    #[test]
    fn duplicates_at_the_split_are_counted_once() {
        let items = [(5, 1.0), (5, 2.0), (5, 4.0), (7, 8.0), (3, 16.0)];
        let index = aggregated(&[1, 2, 0, 1, 3], &items);
        let got = index.range_aggregate(&4, &6).unwrap();
        assert_eq!((got.count, got.sum()), (3, 7.0));
        let got = index.range_aggregate(&3, &7).unwrap();
        assert_eq!((got.count, got.sum(), got.min, got.max), (5, 31.0, 1.0, 16.0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let index = aggregated(&[1], &[(1, 1.0)]);
        assert_eq!(index.range_aggregate(&5, &4), Err(IndexError::InvalidRange));
    }

    #[test]
    fn extremes_follow_deletes() {
        let items = [(1, 3.0), (2, 12.0), (3, -7.0), (4, 5.0), (5, 12.0), (6, 0.0)];
        let mut index = aggregated(&[2, 1, 0, 3, 1, 0], &items);
        let all = index.range_aggregate(&1, &6).unwrap();
        assert_eq!((all.count, all.sum(), all.min, all.max), (6, 25.0, -7.0, 12.0));

        assert!(index.delete(&3));
        assert!(index.delete(&2));
        let rest = index.range_aggregate(&1, &6).unwrap();
        assert_eq!((rest.count, rest.sum(), rest.min, rest.max), (4, 20.0, 0.0, 12.0));
        let inner = index.range_aggregate(&2, &4).unwrap();
        assert_eq!((inner.count, inner.sum(), inner.min, inner.max), (1, 5.0, 5.0, 5.0));
    }

    #[test]
    fn large_values_do_not_swallow_small_ones() {
        let items = [(5, 2.0), (1, -1e18), (3, 1e18), (4, 1.0), (2, 1e17), (0, 0.0)];
        let mut index = aggregated(&[1, 0, 0, 0, 0, 2], &items);
        assert!(index.delete(&2));
        index.validate().unwrap();

        let all = index.range_aggregate(&-1, &10).unwrap();
        assert_eq!((all.count, all.sum()), (5, 3.0));
        assert_eq!(index.range_aggregate(&3, &5).unwrap().sum(), 1e18 + 3.0);
        assert_eq!(index.range_aggregate(&1, &4).unwrap().sum(), 1.0);
    }

    #[test]
    fn nan_payload_leaves_the_index_untouched() {
        let mut index = aggregated(&[1, 2], &[(1, 1.0), (2, 2.0)]);
        let err = index.insert(3, f64::NAN).unwrap_err();
        assert!(matches!(err, IndexError::InvalidPayload(v) if v.is_nan()));
        assert_eq!(index.len(), 2);
        assert_eq!(index.range_aggregate(&0, &9).unwrap().sum(), 3.0);
        index.validate().unwrap();
    }
}
