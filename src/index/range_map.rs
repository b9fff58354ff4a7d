//! Numeric payloads keyed in order, with range aggregation.

use std::fmt;

use rand_core::RngCore;

use crate::augment::RangeAggregate;
use crate::augment::SpanAggregate;
use crate::config::Config;
use crate::config::Duplicates;
use crate::engine::Order;
use crate::engine::SkipIndex;
use crate::error::IndexResult;

/// A sorted multimap from keys to `f64` values answering count, sum, min
/// and max over any key range. Equal keys are kept in stack order.
pub struct RangeAggregateMap<K> {
    inner: SkipIndex<K, f64, SpanAggregate>,
}

impl<K: Ord> RangeAggregateMap<K> {
    pub fn new() -> RangeAggregateMap<K> {
        return RangeAggregateMap {
            inner: SkipIndex::new(Duplicates::Stack),
        };
    }

    pub fn with_config(config: Config) -> IndexResult<RangeAggregateMap<K>> {
        return RangeAggregateMap::with_order(<K as Ord>::cmp, config);
    }
}

impl<K> RangeAggregateMap<K> {
    pub fn with_order(order: Order<K>, config: Config) -> IndexResult<RangeAggregateMap<K>> {
        let inner = SkipIndex::with_order(order, Duplicates::Stack, config)?;
        return Ok(RangeAggregateMap { inner });
    }

    pub fn with_rng<R>(order: Order<K>, config: Config, rng: R) -> IndexResult<RangeAggregateMap<K>>
    where
        R: RngCore + Send + Sync + 'static,
    {
        let inner = SkipIndex::with_rng(order, Duplicates::Stack, config, rng)?;
        return Ok(RangeAggregateMap { inner });
    }

    /// Store `value` under `key`. NaN is rejected and leaves the map
    /// untouched.
    pub fn insert(&mut self, key: K, value: f64) -> IndexResult<()> {
        self.inner.insert(key, value)?;
        return Ok(());
    }

    /// Remove the newest entry under `key`.
    pub fn delete(&mut self, key: &K) -> bool {
        return self.inner.delete(key);
    }

    /// The newest value stored under `key`.
    pub fn get(&self, key: &K) -> Option<f64> {
        return self.inner.search(key).map(|(_, v)| *v);
    }

    pub fn contains(&self, key: &K) -> bool {
        return self.inner.contains(key);
    }

    pub fn range_aggregate(&self, lo: &K, hi: &K) -> IndexResult<RangeAggregate> {
        return self.inner.range_aggregate(lo, hi);
    }

    pub fn rank(&self, key: &K) -> Option<usize> {
        return self.inner.rank(key);
    }

    pub fn select(&self, rank: usize) -> IndexResult<Option<(&K, f64)>> {
        return Ok(self.inner.select(rank)?.map(|(k, v)| (k, *v)));
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

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        return self.inner.iter().map(|(k, v)| (k, *v));
    }

    pub fn validate(&self) -> IndexResult<()> {
        return self.inner.validate();
    }
}

impl<K: Ord> Default for RangeAggregateMap<K> {
    fn default() -> Self {
        return RangeAggregateMap::new();
    }
}

impl<K: fmt::Debug> fmt::Debug for RangeAggregateMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}
