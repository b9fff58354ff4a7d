//! A multiset of closed intervals with overlap search.

use std::fmt;
use std::fmt::Debug;

use rand_core::RngCore;

use crate::augment::Interval;
use crate::augment::IntervalMax;
use crate::config::Config;
use crate::config::Duplicates;
use crate::engine::Order;
use crate::engine::SkipIndex;
use crate::error::IndexResult;

/// Intervals ordered by low bound, then high bound. Equal intervals may be
/// stored more than once.
pub struct IntervalSet<T: Ord + Clone + Debug> {
    inner: SkipIndex<Interval<T>, (), IntervalMax>,
}

impl<T: Ord + Clone + Debug> IntervalSet<T> {
    pub fn new() -> IntervalSet<T> {
        return IntervalSet {
            inner: SkipIndex::new(Duplicates::Stack),
        };
    }

    /// Fails with `UnsupportedSweep` if the config asks for deferred
    /// sweeping.
    pub fn with_config(config: Config) -> IndexResult<IntervalSet<T>> {
        return IntervalSet::with_order(Ord::cmp, config);
    }

    /// Order intervals by `order` instead of low bound, then high bound.
    /// Overlap search skips spans by their largest high bound, so `order`
    /// must still sort by ascending low bound.
    pub fn with_order(order: Order<Interval<T>>, config: Config) -> IndexResult<IntervalSet<T>> {
        let inner = SkipIndex::with_order(order, Duplicates::Stack, config)?;
        return Ok(IntervalSet { inner });
    }

    pub fn with_rng<R>(config: Config, rng: R) -> IndexResult<IntervalSet<T>>
    where
        R: RngCore + Send + Sync + 'static,
    {
        let inner = SkipIndex::with_rng(Ord::cmp, Duplicates::Stack, config, rng)?;
        return Ok(IntervalSet { inner });
    }

    pub fn insert(&mut self, interval: Interval<T>) {
        self.inner.link(interval, ());
    }

    /// Remove one copy of `interval`.
    pub fn delete(&mut self, interval: &Interval<T>) -> bool {
        return self.inner.delete(interval);
    }

    pub fn contains(&self, interval: &Interval<T>) -> bool {
        return self.inner.contains(interval);
    }

    /// The first stored interval, in order, that overlaps `query`.
    pub fn overlap_search(&self, query: &Interval<T>) -> Option<&Interval<T>> {
        return self.inner.overlap_search(query);
    }

    /// Every stored interval that overlaps `query`.
    pub fn overlapping(&self, query: &Interval<T>) -> Vec<&Interval<T>> {
        return self.inner.overlapping(query);
    }

    /// Every stored interval containing `point`.
    pub fn stabbing(&self, point: T) -> Vec<&Interval<T>> {
        return self.inner.overlapping(&Interval::point(point));
    }

    pub fn len(&self) -> usize {
        return self.inner.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.inner.is_empty();
    }

    pub fn height(&self) -> usize {
        return self.inner.height();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval<T>> + '_ {
        return self.inner.iter().map(|(k, _)| k);
    }

    pub fn validate(&self) -> IndexResult<()> {
        return self.inner.validate();
    }
}

impl<T: Ord + Clone + Debug> Default for IntervalSet<T> {
    fn default() -> Self {
        return IntervalSet::new();
    }
}

impl<T: Ord + Clone + Debug> FromIterator<Interval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for interval in iter {
            set.insert(interval);
        }
        return set;
    }
}

impl<T: Ord + Clone + Debug> fmt::Debug for IntervalSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}
