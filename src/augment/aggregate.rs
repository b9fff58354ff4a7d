//! Range-aggregate augmentation: count, sum, min and max of a numeric
//! payload over each span.
//!
//! Sums are carried as an unevaluated pair `hi + lo` and renormalized after
//! every step, so a span's sum does not depend on the order its parts were
//! joined in. A span built by merging sub-spans, or shrunk by retracting
//! one, holds the same sum as a left-to-right rescan of its entries.
//!
//! Min and max are not invertible; when the removed part may have held an
//! extreme the engine rescans from the level below.

use super::Augment;
use super::Counted;
use crate::error::IndexError;
use crate::error::IndexResult;

/// Tolerance for comparing sums, relative to the summed magnitudes.
const SUM_TOLERANCE: f64 = 1e-12;

/// Error-free addition: `a + b == s + e` exactly, with `s = fl(a + b)`.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    if !s.is_finite() {
        return (s, 0.0);
    }
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    return (s, e);
}

/// Add two `hi + lo` pairs and renormalize so `hi` is the rounded total.
#[inline]
fn add_pair(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let (s, e) = two_sum(a.0, b.0);
    if !s.is_finite() {
        return (s, 0.0);
    }
    return two_sum(s, e + a.1 + b.1);
}

/// Count, sum, min and max over a set of payloads.
///
/// The empty aggregate has `count == 0`, a zero sum, `min == +inf` and
/// `max == -inf`, so combining with it is a no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeAggregate {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    hi: f64,
    lo: f64,
    magnitude: f64,
}

impl RangeAggregate {
    pub const EMPTY: RangeAggregate = RangeAggregate {
        count: 0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        hi: 0.0,
        lo: 0.0,
        magnitude: 0.0,
    };

    /// The aggregate of a single payload.
    pub fn single(value: f64) -> RangeAggregate {
        return RangeAggregate {
            count: 1,
            min: value,
            max: value,
            hi: value,
            lo: 0.0,
            magnitude: value.abs(),
        };
    }

    /// Sum of the payloads, correctly rounded while it stays finite.
    pub fn sum(&self) -> f64 {
        return self.hi;
    }

    pub fn is_empty(&self) -> bool {
        return self.count == 0;
    }

    /// Mean payload, or `None` for an empty aggregate.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        return Some(self.hi / self.count as f64);
    }

    /// Join two aggregates over disjoint spans.
    pub fn merge(&self, other: &RangeAggregate) -> RangeAggregate {
        let (hi, lo) = add_pair((self.hi, self.lo), (other.hi, other.lo));
        return RangeAggregate {
            count: self.count + other.count,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            hi,
            lo,
            magnitude: self.magnitude + other.magnitude,
        };
    }

    /// Equality that forgives rounding in the sum, scaled by the summed
    /// magnitude of the payloads.
    pub fn approx_eq(&self, other: &RangeAggregate) -> bool {
        if self.count != other.count {
            return false;
        }
        if self.count == 0 {
            return true;
        }
        let sums_match = if self.hi.is_finite() && other.hi.is_finite() {
            let diff = (self.hi - other.hi) + (self.lo - other.lo);
            let scale = self.magnitude.max(other.magnitude);
            diff.abs() <= SUM_TOLERANCE * scale
        } else {
            // Infinite payloads: both sums must have collapsed the same way.
            self.hi == other.hi || (self.hi.is_nan() && other.hi.is_nan())
        };
        return sums_match && self.min == other.min && self.max == other.max;
    }
}

impl Default for RangeAggregate {
    fn default() -> Self {
        return RangeAggregate::EMPTY;
    }
}

/// Count/sum/min/max over an `f64` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpanAggregate;

impl<K> Augment<K, f64> for SpanAggregate {
    type Value = RangeAggregate;

    const NAME: &'static str = "range-aggregate";

    fn identity() -> RangeAggregate {
        return RangeAggregate::EMPTY;
    }

    fn of(_key: &K, payload: &f64) -> RangeAggregate {
        return RangeAggregate::single(*payload);
    }

    fn combine(left: &RangeAggregate, right: &RangeAggregate) -> RangeAggregate {
        return left.merge(right);
    }

    fn retract(whole: &RangeAggregate, part: &RangeAggregate) -> Option<RangeAggregate> {
        let count = whole.count.checked_sub(part.count)?;
        if count == 0 {
            return Some(RangeAggregate::EMPTY);
        }
        if part.count == 0 {
            return Some(*whole);
        }
        if part.min <= whole.min || part.max >= whole.max {
            return None;
        }
        if !whole.hi.is_finite() || !part.hi.is_finite() {
            return None;
        }
        let (hi, lo) = add_pair((whole.hi, whole.lo), (-part.hi, -part.lo));
        return Some(RangeAggregate {
            count,
            min: whole.min,
            max: whole.max,
            hi,
            lo,
            magnitude: (whole.magnitude - part.magnitude).max(0.0),
        });
    }

    fn admit(payload: &f64) -> IndexResult<()> {
        if payload.is_nan() {
            return Err(IndexError::InvalidPayload(*payload));
        }
        return Ok(());
    }

    fn same(a: &RangeAggregate, b: &RangeAggregate) -> bool {
        return a.approx_eq(b);
    }
}

impl<K> Counted<K, f64> for SpanAggregate {
    fn count(value: &RangeAggregate) -> usize {
        return value.count;
    }
}
