//! Augmentation strategies.
//!
//! Every index node carries a value summarizing the half-open span of base
//! entries it skips over: everything after its left neighbour's entry, up
//! to and including its own entry. The engine keeps these values exact
//! across every link and unlink, and queries use them to skip whole spans.
//!
//! A strategy is a commutative monoid over entries (`identity`, `of`,
//! `combine`) plus an optional inverse (`retract`) for cheap span shrinking.
//! When `retract` cannot answer, the engine recomputes the span from the
//! already-correct level below it.
//!
//! | Strategy      | Value                    | Queries                |
//! |---------------|--------------------------|------------------------|
//! | `Plain`       | `()`                     | membership             |
//! | `IntervalMax` | max upper bound          | overlap (stabbing)     |
//! | `Distance`    | entry count              | rank, select           |
//! | `SpanAggregate` | count, sum, min, max   | range aggregate, rank  |

use std::fmt::Debug;

use crate::error::IndexResult;

pub mod aggregate;
pub mod distance;
pub mod interval;
pub mod plain;

pub use aggregate::RangeAggregate;
pub use aggregate::SpanAggregate;
pub use distance::Distance;
pub use interval::Interval;
pub use interval::IntervalMax;
pub use plain::Plain;

/// A per-span statistic maintained on every index node.
pub trait Augment<K, P> {
    /// The value stored on an index node.
    type Value: Clone + Debug;

    /// Name used in error messages.
    const NAME: &'static str;

    /// Whether spans stay valid when tombstoned entries linger in the
    /// structure. Only a strategy with nothing to keep in sync can say yes.
    const TOLERATES_TOMBSTONES: bool = false;

    /// The value of an empty span.
    fn identity() -> Self::Value;

    /// The value of a span holding exactly one entry.
    fn of(key: &K, payload: &P) -> Self::Value;

    /// The value of two adjacent spans joined together.
    fn combine(left: &Self::Value, right: &Self::Value) -> Self::Value;

    /// The value of `whole` with the sub-span `part` taken out, if it can be
    /// derived without looking at the entries again.
    fn retract(whole: &Self::Value, part: &Self::Value) -> Option<Self::Value>;

    /// Equality used by structural validation.
    fn same(a: &Self::Value, b: &Self::Value) -> bool;

    /// Refuse a payload the strategy cannot summarize. Checked before the
    /// index is touched.
    fn admit(_payload: &P) -> IndexResult<()> {
        return Ok(());
    }

    /// Fold a run of entries into one value.
    fn fold<'a, I>(entries: I) -> Self::Value
    where
        I: IntoIterator<Item = (&'a K, &'a P)>,
        K: 'a,
        P: 'a,
    {
        let mut acc = Self::identity();
        for (key, payload) in entries {
            acc = Self::combine(&acc, &Self::of(key, payload));
        }
        return acc;
    }
}

/// Strategies whose values know how many entries their span holds. These
/// support rank and select.
pub trait Counted<K, P>: Augment<K, P> {
    fn count(value: &Self::Value) -> usize;
}
