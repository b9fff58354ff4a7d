//! Distance augmentation: each index node counts the entries in its span.
//!
//! Summing distances along a search path gives the number of entries before
//! the landing point, which is what rank and select walk on.

use super::Augment;
use super::Counted;

/// Span length in entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct Distance;

impl<K, P> Augment<K, P> for Distance {
    type Value = usize;

    const NAME: &'static str = "distance";

    fn identity() -> usize {
        return 0;
    }

    fn of(_key: &K, _payload: &P) -> usize {
        return 1;
    }

    fn combine(left: &usize, right: &usize) -> usize {
        return left + right;
    }

    fn retract(whole: &usize, part: &usize) -> Option<usize> {
        return whole.checked_sub(*part);
    }

    fn same(a: &usize, b: &usize) -> bool {
        return a == b;
    }
}

impl<K, P> Counted<K, P> for Distance {
    fn count(value: &usize) -> usize {
        return *value;
    }
}
