//! Rank and select over count-carrying strategies.
//!
//! Span counts summed along a walk give the number of entries before the
//! landing point, so both directions are one walk plus a short base scan.

use std::cmp::Ordering;

use crate::augment::Counted;
use crate::engine::SkipIndex;
use crate::engine::Step;
use crate::engine::arena::NULL;
use crate::error::IndexError;
use crate::error::IndexResult;

impl<K, P, A: Counted<K, P>> SkipIndex<K, P, A> {
    /// 1-based position of the first entry equal to `key`, or `None` if
    /// the key is absent.
    pub fn rank(&self, key: &K) -> Option<usize> {
        let mut before = 0;
        let landing = self.walk(|k, value| {
            if self.compare(key, k) == Ordering::Greater {
                before += A::count(value);
                return Step::Right;
            }
            return Step::Down;
        });

        let mut e = self.node(landing.node).entry;
        loop {
            e = self.live_next(e);
            if e == NULL {
                return None;
            }
            before += 1;
            match self.compare(key, self.key(e)) {
                Ordering::Greater => continue,
                Ordering::Equal => return Some(before),
                Ordering::Less => return None,
            }
        }
    }

    /// The entry at 1-based position `rank`, or `None` past the end.
    pub fn select(&self, rank: usize) -> IndexResult<Option<(&K, &P)>> {
        if rank == 0 {
            return Err(IndexError::InvalidRank(rank));
        }
        if rank > self.len() {
            return Ok(None);
        }

        let mut remaining = rank;
        let landing = self.walk(|_, value| {
            let span = A::count(value);
            if span < remaining {
                remaining -= span;
                return Step::Right;
            }
            if span == remaining {
                return Step::Stop;
            }
            return Step::Down;
        });
        if landing.stopped {
            return Ok(self.item(self.node(landing.next).entry));
        }

        let mut e = self.node(landing.node).entry;
        while remaining > 0 {
            e = self.live_next(e);
            if e == NULL {
                return Ok(None);
            }
            remaining -= 1;
        }
        return Ok(self.item(e));
    }

    /// Number of entries below `key`, or at most `key` when `inclusive`.
    pub fn count_below(&self, key: &K, inclusive: bool) -> usize {
        let passes = |ord: Ordering| ord == Ordering::Greater || (inclusive && ord == Ordering::Equal);

        let mut before = 0;
        let landing = self.walk(|k, value| {
            if passes(self.compare(key, k)) {
                before += A::count(value);
                return Step::Right;
            }
            return Step::Down;
        });

        let mut e = self.live_next(self.node(landing.node).entry);
        while e != NULL && passes(self.compare(key, self.key(e))) {
            before += 1;
            e = self.live_next(e);
        }
        return before;
    }

    /// Number of entries with keys in `[lo, hi]`.
    pub fn count_range(&self, lo: &K, hi: &K) -> IndexResult<usize> {
        if self.compare(lo, hi) == Ordering::Greater {
            return Err(IndexError::InvalidRange);
        }
        return Ok(self.count_below(hi, true) - self.count_below(lo, false));
    }
}
