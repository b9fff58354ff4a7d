//! Interval-max augmentation for stabbing queries.
//!
//! Intervals are ordered by low bound, then high bound. Each index node
//! records the largest high bound in its span. A search for intervals
//! overlapping `[lo, hi]` can skip any span whose max is below `lo`: nothing
//! in it reaches far enough right.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::Augment;
use crate::error::IndexError;
use crate::error::IndexResult;

/// A closed interval `[low, high]` with `low <= high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    low: T,
    high: T,
}

impl<T: Ord> Interval<T> {
    /// Create an interval, rejecting `low > high`.
    pub fn new(low: T, high: T) -> IndexResult<Interval<T>> {
        if low > high {
            return Err(IndexError::InvalidInterval);
        }
        return Ok(Interval { low, high });
    }

    /// An interval holding a single point.
    pub fn point(at: T) -> Interval<T>
    where
        T: Clone,
    {
        return Interval {
            low: at.clone(),
            high: at,
        };
    }

    pub fn low(&self) -> &T {
        return &self.low;
    }

    pub fn high(&self) -> &T {
        return &self.high;
    }

    /// Whether the two closed intervals share at least one point.
    pub fn overlaps(&self, other: &Interval<T>) -> bool {
        return self.low <= other.high && other.low <= self.high;
    }

    /// Whether `at` lies inside the interval.
    pub fn contains(&self, at: &T) -> bool {
        return self.low <= *at && *at <= self.high;
    }
}

impl<T: Ord> PartialOrd for Interval<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl<T: Ord> Ord for Interval<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        return self
            .low
            .cmp(&other.low)
            .then_with(|| self.high.cmp(&other.high));
    }
}

/// Largest high bound over a span. `None` only for the empty span.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalMax;

impl<T: Ord + Clone + Debug> Augment<Interval<T>, ()> for IntervalMax {
    type Value = Option<T>;

    const NAME: &'static str = "interval-max";

    fn identity() -> Option<T> {
        return None;
    }

    fn of(key: &Interval<T>, _payload: &()) -> Option<T> {
        return Some(key.high.clone());
    }

    fn combine(left: &Option<T>, right: &Option<T>) -> Option<T> {
        return match (left, right) {
            (Some(a), Some(b)) => Some(if a >= b { a.clone() } else { b.clone() }),
            (Some(a), None) => Some(a.clone()),
            (None, b) => b.clone(),
        };
    }

    fn retract(whole: &Option<T>, part: &Option<T>) -> Option<Option<T>> {
        // The max survives only if the removed part could not have held it.
        return match (whole, part) {
            (_, None) => Some(whole.clone()),
            (Some(w), Some(p)) if p < w => Some(whole.clone()),
            _ => None,
        };
    }

    fn same(a: &Option<T>, b: &Option<T>) -> bool {
        return a == b;
    }
}
