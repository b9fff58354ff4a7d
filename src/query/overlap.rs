//! Overlap (stabbing) search over interval keys.
//!
//! The walk moves right past every span whose largest high bound is still
//! left of the query, so everything before the landing point ends too early
//! to overlap. From there the base chain is scanned in low-bound order until
//! an interval starts past the query's high bound.

use std::fmt::Debug;

use crate::augment::Interval;
use crate::augment::IntervalMax;
use crate::engine::Landing;
use crate::engine::SkipIndex;
use crate::engine::Step;
use crate::engine::arena::NULL;

impl<T: Ord + Clone + Debug> SkipIndex<Interval<T>, (), IntervalMax> {
    fn overlap_landing(&self, query: &Interval<T>) -> Landing {
        return self.walk(|_, max| match max {
            Some(m) if m < query.low() => Step::Right,
            _ => Step::Down,
        });
    }

    /// The first stored interval in key order that overlaps `query`.
    pub fn overlap_search(&self, query: &Interval<T>) -> Option<&Interval<T>> {
        let landing = self.overlap_landing(query);
        let mut e = self.node(landing.node).entry;
        loop {
            e = self.live_next(e);
            if e == NULL {
                return None;
            }
            let interval = self.key(e);
            if interval.low() > query.high() {
                return None;
            }
            if interval.overlaps(query) {
                return Some(interval);
            }
        }
    }

    /// Every stored interval overlapping `query`, in key order.
    pub fn overlapping(&self, query: &Interval<T>) -> Vec<&Interval<T>> {
        let landing = self.overlap_landing(query);
        let mut found = Vec::new();
        let mut e = self.live_next(self.node(landing.node).entry);
        while e != NULL {
            let interval = self.key(e);
            if interval.low() > query.high() {
                break;
            }
            if interval.overlaps(query) {
                found.push(interval);
            }
            e = self.live_next(e);
        }
        return found;
    }
}

#[cfg(test)]
mod tests {
    use crate::augment::Interval;
    use crate::augment::IntervalMax;
    use crate::config::Config;
    use crate::config::Duplicates;
    use crate::engine::SkipIndex;
    use crate::level::ReplayBits;

    fn iv(low: i64, high: i64) -> Interval<i64> {
        return Interval::new(low, high).unwrap();
    }

    fn index(levels: &[usize], items: &[(i64, i64)]) -> SkipIndex<Interval<i64>, (), IntervalMax> {
        let rng = ReplayBits::from_levels(levels);
        let mut index: SkipIndex<Interval<i64>, (), IntervalMax> =
            SkipIndex::with_rng(Ord::cmp, Duplicates::Stack, Config::new(), rng).unwrap();
        for &(low, high) in items {
            index.insert(iv(low, high), ()).unwrap();
        }
        return index;
    }

    #[test]
    fn gap_between_intervals_misses() {
        let index = index(&[1, 2], &[(1, 5), (10, 20)]);
        assert_eq!(index.overlap_search(&iv(6, 9)), None);
        assert!(index.overlapping(&iv(6, 9)).is_empty());
    }

    #[test]
    fn query_spanning_both_finds_one() {
        let index = index(&[1, 2], &[(1, 5), (10, 20)]);
        let hit = index.overlap_search(&iv(4, 11)).unwrap();
        assert!(*hit == iv(1, 5) || *hit == iv(10, 20));
        assert_eq!(index.overlapping(&iv(4, 11)), vec![&iv(1, 5), &iv(10, 20)]);
    }

    #[test]
    fn long_interval_early_in_order_is_found() {
        // [0, 100] sits before many short intervals that end early.
        let mut items: Vec<(i64, i64)> = vec![(0, 100)];
        for start in 1..30 {
            items.push((start * 2, start * 2 + 1));
        }
        let index = index(&[0, 1, 0, 2, 3, 1], &items);
        assert_eq!(index.overlap_search(&iv(90, 95)), Some(&iv(0, 100)));
        assert_eq!(index.overlapping(&iv(90, 95)), vec![&iv(0, 100)]);
        assert_eq!(index.overlapping(&iv(10, 11)), vec![&iv(0, 100), &iv(10, 11)]);
    }

    #[test]
    fn touching_endpoints_overlap() {
        let index = index(&[2, 0, 1], &[(1, 5), (7, 9)]);
        assert_eq!(index.overlap_search(&iv(5, 6)), Some(&iv(1, 5)));
        assert_eq!(index.overlap_search(&iv(6, 7)), Some(&iv(7, 9)));
        assert_eq!(index.overlap_search(&iv(10, 12)), None);
    }

    #[test]
    fn deleted_intervals_no_longer_match() {
        let mut index = index(&[1, 3, 0, 2], &[(0, 50), (5, 6), (20, 30), (40, 45)]);
        assert_eq!(index.overlap_search(&iv(44, 60)), Some(&iv(0, 50)));
        assert!(index.delete(&iv(0, 50)));
        assert_eq!(index.overlap_search(&iv(44, 60)), Some(&iv(40, 45)));
        assert!(index.delete(&iv(40, 45)));
        assert_eq!(index.overlap_search(&iv(44, 60)), None);
    }
}
